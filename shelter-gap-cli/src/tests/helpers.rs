//! Test helpers for writing source tables into a scratch workspace.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) const SHELTER_CSV: &str = "\
OCCUPANCY_DATE,LOCATION_NAME,LOCATION_ADDRESS,lat,lon,CAPACITY_ACTUAL_BED,OCCUPIED_BEDS
2024-01-01,Queen St Hostel,100 Queen St W,43.65,-79.38,100,98
2024-01-02,Queen St Hostel,100 Queen St W,43.65,-79.38,100,98
2024-01-01,Harbour House,5 Harbour Sq,,,40,30
";

pub(super) const DEMAND_CSV: &str = "\
name,lat,lon,weight
A,43.66,-79.40,90
";

pub(super) const GEOCODE_CSV: &str = "\
address,lat,lon
\"5 Harbour Sq, Toronto\",43.64,-79.38
";

pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture");
}
