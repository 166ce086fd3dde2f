//! Domain models for the lottosheet pipeline.
//!
//! - [`CellValue`] - One raw spreadsheet cell (blank, text or number)
//! - [`RawGrid`] - Rectangular block of raw cells, row-major
//! - [`Game`] - One validated 6/45 ticket line

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

// =============================================================================
// Lottery Rules
// =============================================================================

/// Smallest number that can be drawn.
pub const MIN_NUMBER: i64 = 1;

/// Largest number that can be drawn.
pub const MAX_NUMBER: i64 = 45;

/// Numbers on one ticket line.
pub const NUMBERS_PER_GAME: usize = 6;

/// Whether `n` is a drawable number.
pub fn in_number_range(n: i64) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&n)
}

// =============================================================================
// Cells
// =============================================================================

/// A raw cell value as handed over by a grid source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// The source's "no value" marker.
    #[default]
    Empty,
    /// Any textual content, untouched.
    Text(String),
    /// A numeric cell.
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Build a cell from free text the way a spreadsheet stores typed input:
    /// blank becomes `Empty`, a plain decimal becomes `Number`.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() && looks_decimal(trimmed) => CellValue::Number(n),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }
}

/// `f64::from_str` also accepts "inf", "NaN" and friends; spreadsheets don't.
fn looks_decimal(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::String(s) if s.is_empty() => CellValue::Empty,
            Value::String(s) => CellValue::Text(s),
            Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
            Value::Bool(b) => CellValue::Text(b.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(CellValue::from)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_str(""),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            CellValue::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

/// Row-major block of raw cells. Rows may have any length.
pub type RawGrid = Vec<Vec<CellValue>>;

// =============================================================================
// Games
// =============================================================================

/// One ticket line that passed validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    /// 1-based row of the grid this game came from. Not renumbered when
    /// earlier rows are dropped.
    #[serde(rename = "game")]
    pub index: u32,
    /// Numbers in original column order.
    pub numbers: Vec<u8>,
}

impl Game {
    pub fn new(index: u32, numbers: Vec<u8>) -> Self {
        Self { index, numbers }
    }

    /// Six numbers, all drawable.
    pub fn is_well_formed(&self) -> bool {
        self.numbers.len() == NUMBERS_PER_GAME
            && self.numbers.iter().all(|&n| in_number_range(i64::from(n)))
    }

    pub fn has_duplicates(&self) -> bool {
        let mut seen = [false; MAX_NUMBER as usize + 1];
        self.numbers.iter().any(|&n| {
            let slot = &mut seen[usize::from(n).min(MAX_NUMBER as usize)];
            std::mem::replace(slot, true)
        })
    }
}
