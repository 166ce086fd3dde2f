//! Grid sources: where raw cells come from.
//!
//! The pipeline never touches a global "active spreadsheet". It is handed a
//! [`GridSource`], asks it for a sheet by name, and reads a rectangular
//! [`CellRange`] out of the returned [`Sheet`].
//!
//! | Backend            | Layout                                          |
//! |--------------------|-------------------------------------------------|
//! | [`CsvWorkbook`]    | directory, one `<sheet>.csv` per sheet          |
//! | [`JsonWorkbook`]   | one JSON file, `{ "<sheet>": [[cell, ...]] }`   |
//! | [`MemoryWorkbook`] | sheets held in memory                           |

mod csv_workbook;
mod json_workbook;
mod memory;

pub use csv_workbook::CsvWorkbook;
pub use json_workbook::JsonWorkbook;
pub use memory::MemoryWorkbook;

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{GridError, GridResult};
use crate::models::{CellValue, RawGrid};

/// Range read when none is configured: five games of six numbers.
pub const DEFAULT_RANGE: &str = "C2:H6";

/// Sheet read when none is configured.
pub const DEFAULT_SHEET: &str = "추첨번호";

/// Most cells a single range may cover.
pub const MAX_RANGE_CELLS: usize = 1_000_000;

// =============================================================================
// GridSource
// =============================================================================

/// A read-only tabular data source.
pub trait GridSource: Send + Sync {
    /// Fetch a sheet by exact name.
    ///
    /// `Ok(None)` means the sheet does not exist, which callers must keep
    /// apart from a sheet that exists but is empty. `Err` is reserved for
    /// faults while reading it.
    fn open_sheet(&self, name: &str) -> GridResult<Option<Sheet>>;
}

impl<T: GridSource + ?Sized> GridSource for std::sync::Arc<T> {
    fn open_sheet(&self, name: &str) -> GridResult<Option<Sheet>> {
        (**self).open_sheet(name)
    }
}

/// Open the workbook at `path`: a `.json` file, otherwise a directory of
/// CSV sheets. Nothing is read until a sheet is requested.
pub fn open_workbook(path: impl AsRef<Path>) -> Box<dyn GridSource> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") && !path.is_dir() => {
            Box::new(JsonWorkbook::new(path))
        }
        _ => Box::new(CsvWorkbook::new(path)),
    }
}

// =============================================================================
// Sheet
// =============================================================================

/// The cells of one sheet, as stored. Rows may be ragged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: RawGrid,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: RawGrid) -> Self {
        Self { name: name.into(), rows }
    }

    /// Read a rectangular block. Always `range.height()` rows of
    /// `range.width()` cells; anything past the stored data is `Empty`.
    pub fn values(&self, range: &CellRange) -> RawGrid {
        (range.start_row..=range.end_row)
            .map(|r| {
                let row = self.rows.get(r);
                (range.start_col..=range.end_col)
                    .map(|c| row.and_then(|cells| cells.get(c)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

// =============================================================================
// A1 Ranges
// =============================================================================

static A1_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{1,3})([1-9][0-9]{0,6}):([A-Za-z]{1,3})([1-9][0-9]{0,6})$")
        .expect("A1 range pattern is valid")
});

/// An inclusive rectangular block of cells, 0-based internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl CellRange {
    /// Parse A1 notation such as `C2:H6`. Corners may be given in any order.
    pub fn parse(text: &str) -> GridResult<Self> {
        let caps = A1_RANGE
            .captures(text.trim())
            .ok_or_else(|| GridError::InvalidRange(text.to_string()))?;

        let col = |i: usize| column_index(&caps[i]);
        let row = |i: usize| {
            caps[i]
                .parse::<usize>()
                .map(|r| r - 1)
                .map_err(|_| GridError::InvalidRange(text.to_string()))
        };

        let (r1, c1, r2, c2) = (row(2)?, col(1), row(4)?, col(3));
        let range = Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        };

        let cells = range.height().saturating_mul(range.width());
        if cells > MAX_RANGE_CELLS {
            return Err(GridError::RangeTooLarge {
                range: range.to_string(),
                cells,
                limit: MAX_RANGE_CELLS,
            });
        }
        Ok(range)
    }

    pub fn height(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn width(&self) -> usize {
        self.end_col - self.start_col + 1
    }
}

impl Default for CellRange {
    fn default() -> Self {
        // C2:H6
        Self { start_row: 1, start_col: 2, end_row: 5, end_col: 7 }
    }
}

impl FromStr for CellRange {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_letters(self.start_col),
            self.start_row + 1,
            column_letters(self.end_col),
            self.end_row + 1
        )
    }
}

/// `A` → 0, `Z` → 25, `AA` → 26.
fn column_index(letters: &str) -> usize {
    letters
        .bytes()
        .fold(0, |acc, b| acc * 26 + usize::from(b.to_ascii_uppercase() - b'A' + 1))
        - 1
}

fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Shorthand used by tests and [`MemoryWorkbook`] callers.
pub fn grid_from_rows<R, C>(rows: R) -> RawGrid
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: Into<CellValue>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_range() {
        let range = CellRange::parse(DEFAULT_RANGE).unwrap();
        assert_eq!(range, CellRange::default());
        assert_eq!(range.height(), 5);
        assert_eq!(range.width(), 6);
        assert_eq!(range.to_string(), "C2:H6");
    }

    #[test]
    fn test_parse_reversed_and_lowercase() {
        let range: CellRange = "h6:c2".parse().unwrap();
        assert_eq!(range.to_string(), "C2:H6");
    }

    #[test]
    fn test_multi_letter_columns() {
        let range = CellRange::parse("Z1:AB3").unwrap();
        assert_eq!(range.start_col, 25);
        assert_eq!(range.end_col, 27);
        assert_eq!(range.to_string(), "Z1:AB3");
    }

    #[test]
    fn test_invalid_ranges() {
        for text in ["", "C2", "C0:H6", "2C:H6", "C2-H6", "ABCD1:B2"] {
            assert!(
                matches!(CellRange::parse(text), Err(GridError::InvalidRange(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_open_workbook_picks_backend() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("s.csv"), "1,2\n").unwrap();
        std::fs::write(dir.path().join("book.json"), r#"{"s": [[3]]}"#).unwrap();

        let csv = open_workbook(dir.path()).open_sheet("s").unwrap().unwrap();
        assert_eq!(csv.rows[0][1], CellValue::Number(2.0));

        let json = open_workbook(dir.path().join("book.json")).open_sheet("s").unwrap().unwrap();
        assert_eq!(json.rows[0][0], CellValue::Number(3.0));

        let nowhere = open_workbook(dir.path().join("missing"));
        assert!(nowhere.open_sheet("s").unwrap().is_none());
    }

    #[test]
    fn test_oversized_range_rejected() {
        let err = CellRange::parse("A1:ZZZ9999999").unwrap_err();
        assert!(matches!(err, GridError::RangeTooLarge { limit: MAX_RANGE_CELLS, .. }));

        // 1000 × 1000 is exactly at the limit
        assert!(CellRange::parse("A1:ALL1000").is_ok());
        assert!(CellRange::parse("A1:ALL1001").is_err());
    }

    #[test]
    fn test_values_pads_to_rectangle() {
        let sheet = Sheet::new("s", grid_from_rows(vec![vec![1i64, 2, 3], vec![4]]));
        let range = CellRange::parse("B1:C3").unwrap();
        let values = sheet.values(&range);

        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|row| row.len() == 2));
        assert_eq!(values[0], vec![CellValue::Number(2.0), CellValue::Number(3.0)]);
        assert_eq!(values[1], vec![CellValue::Empty, CellValue::Empty]);
        assert_eq!(values[2], vec![CellValue::Empty, CellValue::Empty]);
    }
}
