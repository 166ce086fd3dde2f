use std::collections::HashMap;

use super::{GridSource, Sheet};
use crate::error::GridResult;
use crate::models::RawGrid;

/// Sheets held in memory. Handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: HashMap<String, RawGrid>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, rows: RawGrid) -> Self {
        self.insert(name, rows);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, rows: RawGrid) {
        self.sheets.insert(name.into(), rows);
    }
}

impl GridSource for MemoryWorkbook {
    fn open_sheet(&self, name: &str) -> GridResult<Option<Sheet>> {
        Ok(self.sheets.get(name).map(|rows| Sheet::new(name, rows.clone())))
    }
}
