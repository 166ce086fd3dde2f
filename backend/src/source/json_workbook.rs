use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{GridSource, Sheet};
use crate::error::{GridError, GridResult};
use crate::models::RawGrid;

/// A single JSON file mapping sheet names to rows of cells:
///
/// ```json
/// { "추첨번호": [["", "", 1, 2, 3, 4, 5, 6], [null, "x", "12abc"]] }
/// ```
#[derive(Debug, Clone)]
pub struct JsonWorkbook {
    path: PathBuf,
}

impl JsonWorkbook {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    fn load(&self) -> GridResult<BTreeMap<String, RawGrid>> {
        let content = std::fs::read_to_string(&self.path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        if !value.is_object() {
            return Err(GridError::InvalidWorkbook(
                "top-level JSON value must be an object of sheets".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl GridSource for JsonWorkbook {
    fn open_sheet(&self, name: &str) -> GridResult<Option<Sheet>> {
        let mut sheets = self.load()?;
        Ok(sheets.remove(name).map(|rows| Sheet::new(name, rows)))
    }
}
