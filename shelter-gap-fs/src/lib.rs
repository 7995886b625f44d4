//! Capability-based file access for analysis inputs and snapshot outputs.
//!
//! Source tables are opened through `cap-std` with ambient authority at the
//! edge of the program; the snapshot is written through a directory handle so
//! output never escapes the chosen directory.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Write};
use std::path::Component;

/// Open a source table for reading.
pub fn open_source_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Open the directory containing `path` and return it with the file name.
pub fn open_parent_dir(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("source path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Whether `path` names a regular file.
///
/// Returns an error of kind [`io::ErrorKind::NotFound`] when nothing exists
/// at `path`.
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_parent_dir(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Create `path` (and any missing parents) and open it as a directory.
///
/// Fails when `path` exists but is not a directory.
pub fn open_output_dir(path: &Utf8Path) -> io::Result<fs_utf8::Dir> {
    let (base, relative) = split_anchor(path)?;
    if relative.as_str().is_empty() {
        return Ok(base);
    }
    base.create_dir_all(&relative)?;
    base.open_dir(&relative)
}

/// Replace `name` inside `dir` with `contents`.
pub fn write_output(dir: &fs_utf8::Dir, name: &str, contents: &[u8]) -> io::Result<()> {
    let mut file = dir.create(name)?;
    file.write_all(contents)?;
    file.flush()
}

/// Split a path into an ambient anchor directory and the path below it.
///
/// Absolute paths anchor at the filesystem root (or Windows prefix); relative
/// paths anchor at the current directory.
pub fn split_anchor(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();
    let (anchor, relative) = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let anchor = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(anchor.as_std_path())
                .or_else(|_| std_path.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from path"))?
                .to_path_buf();
            (anchor, relative)
        }
        Some(Component::RootDir) => {
            let anchor = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(anchor.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from path"))?
                .to_path_buf();
            (anchor, relative)
        }
        _ => (Utf8PathBuf::from("."), std_path.to_path_buf()),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?;
    let relative =
        Utf8PathBuf::from_path_buf(relative).map_err(|_| io::Error::other("non-UTF-8 path"))?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::Read;
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temporary directory")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp path")
    }

    #[rstest]
    fn regular_files_are_recognised(temp_dir: TempDir) {
        let root = utf8(&temp_dir);
        let file = root.join("shelters.csv");
        std::fs::write(&file, "name,lat,lon\n").expect("write source");
        assert!(is_regular_file(&file).expect("metadata"));
        assert!(!is_regular_file(&root).unwrap_or(false));
    }

    #[rstest]
    fn missing_sources_report_not_found(temp_dir: TempDir) {
        let missing = utf8(&temp_dir).join("missing.csv");
        let err = is_regular_file(&missing).expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn output_dir_is_created_and_written(temp_dir: TempDir) {
        let target = utf8(&temp_dir).join("out/snapshot");
        let dir = open_output_dir(&target).expect("create output dir");
        write_output(&dir, "clusters.json", b"[]").expect("write output");
        write_output(&dir, "clusters.json", b"[1]").expect("overwrite output");
        let written = std::fs::read_to_string(target.join("clusters.json")).expect("read back");
        assert_eq!(written, "[1]");
    }

    #[rstest]
    fn output_path_must_not_be_a_file(temp_dir: TempDir) {
        let target = utf8(&temp_dir).join("taken");
        std::fs::write(&target, "").expect("write blocker");
        assert!(open_output_dir(&target).is_err());
    }

    #[rstest]
    fn sources_open_for_reading(temp_dir: TempDir) {
        let file = utf8(&temp_dir).join("demand.csv");
        std::fs::write(&file, "name\nA\n").expect("write source");
        let mut contents = String::new();
        open_source_file(&file)
            .expect("open source")
            .read_to_string(&mut contents)
            .expect("read source");
        assert_eq!(contents, "name\nA\n");
    }

    #[rstest]
    fn absolute_paths_anchor_at_the_root(temp_dir: TempDir) {
        let root = utf8(&temp_dir);
        let (_, relative) = split_anchor(&root).expect("split");
        assert!(!relative.is_absolute());
        assert!(root.as_str().ends_with(relative.as_str()));
    }
}
