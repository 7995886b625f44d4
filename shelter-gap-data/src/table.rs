//! Untyped tabular input as read from source files.

use std::io::Read;

use thiserror::Error;

/// Error raised while decoding a CSV source.
#[derive(Debug, Error)]
#[error("failed to read CSV source {source_name}: {source}")]
pub struct LoadError {
    /// Human-readable name of the source, usually its path.
    pub source_name: String,
    /// Decoder failure.
    #[source]
    pub source: csv::Error,
}

/// A table of string cells with a header row.
///
/// Column lookup is case-insensitive and ignores surrounding whitespace, so
/// `LOCATION_NAME`, `location_name` and ` Location_Name ` all match.
///
/// # Examples
/// ```
/// use shelter_gap_data::RawTable;
///
/// let table = RawTable::new(
///     ["Name", "LAT"],
///     vec![vec!["A".to_owned(), "43.6".to_owned()]],
/// );
/// assert_eq!(table.column(&["lat", "latitude"]), Some(1));
/// assert_eq!(table.cell(0, Some(0)), Some("A"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from headers and rows.
    pub fn new<H, S>(headers: H, rows: Vec<Vec<String>>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows,
        }
    }

    /// Decode a CSV document with a header row.
    ///
    /// Rows may have fewer or more cells than the header; missing cells read
    /// as empty.
    pub fn from_csv_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, LoadError> {
        let wrap = |source| LoadError {
            source_name: source_name.to_owned(),
            source,
        };
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader
            .headers()
            .map_err(wrap)?
            .iter()
            .map(str::to_owned)
            .collect();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(wrap)?;
            rows.push(record.iter().map(str::to_owned).collect());
        }
        Ok(Self { headers, rows })
    }

    /// Header names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first header matching any alias, trying aliases in order.
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            self.headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(alias.trim()))
        })
    }

    /// Trimmed, non-empty cell at `row` in `column`.
    pub fn cell(&self, row: usize, column: Option<usize>) -> Option<&str> {
        let value = self.rows.get(row)?.get(column?)?.trim();
        (!value.is_empty()).then_some(value)
    }
}
