//! Lenient numeric cell parsing.

/// Outcome of reading one numeric cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NumberCell {
    /// Empty, or a null marker such as `nan` or `NULL`.
    Missing,
    /// A finite number.
    Value(f64),
    /// Text that is not a finite number.
    Invalid(String),
}

const NULL_MARKERS: &[&str] = &["nan", "none", "null", "n/a", "na"];

/// Whether `cell` is a spreadsheet-style null marker.
pub(crate) fn is_null_marker(cell: &str) -> bool {
    NULL_MARKERS
        .iter()
        .any(|marker| cell.trim().eq_ignore_ascii_case(marker))
}

/// Classify a cell. Thousands separators are not accepted.
pub(crate) fn read_number(cell: Option<&str>) -> NumberCell {
    let Some(text) = cell.map(str::trim).filter(|t| !t.is_empty()) else {
        return NumberCell::Missing;
    };
    if is_null_marker(text) {
        return NumberCell::Missing;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => NumberCell::Value(value),
        _ => NumberCell::Invalid(text.to_owned()),
    }
}

/// Finite number in `cell`, treating anything else as absent.
pub(crate) fn parse_number(cell: &str) -> Option<f64> {
    match read_number(Some(cell)) {
        NumberCell::Value(value) => Some(value),
        NumberCell::Missing | NumberCell::Invalid(_) => None,
    }
}
