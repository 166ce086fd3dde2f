use std::path::{Path, PathBuf};

use super::{GridSource, Sheet};
use crate::error::GridResult;
use crate::parser::parse_grid_bytes;

/// A directory where every `<sheet>.csv` file is one sheet.
///
/// Files are read on every call; nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    fn sheet_path(&self, name: &str) -> Option<PathBuf> {
        // a sheet name never addresses anything outside the workbook
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return None;
        }
        Some(self.dir.join(format!("{}.csv", name)))
    }
}

impl GridSource for CsvWorkbook {
    fn open_sheet(&self, name: &str) -> GridResult<Option<Sheet>> {
        let Some(path) = self.sheet_path(name) else {
            return Ok(None);
        };
        if !path.is_file() {
            return Ok(None);
        }

        let bytes = std::fs::read(&path)?;
        let rows = parse_grid_bytes(&bytes)?;
        Ok(Some(Sheet::new(name, rows)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;
    use crate::source::CellRange;
    use tempfile::tempdir;

    #[test]
    fn test_reads_sheet_by_file_stem() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("추첨번호.csv"), "회차,구분,1,2,3,4,5,6\n").unwrap();

        let workbook = CsvWorkbook::new(dir.path());
        let sheet = workbook.open_sheet("추첨번호").unwrap().unwrap();

        assert_eq!(sheet.name, "추첨번호");
        assert_eq!(sheet.rows[0][0], CellValue::Text("회차".into()));
        assert_eq!(sheet.rows[0][2], CellValue::Number(1.0));
    }

    #[test]
    fn test_missing_sheet_is_none() {
        let dir = tempdir().unwrap();
        let workbook = CsvWorkbook::new(dir.path());

        assert!(workbook.open_sheet("추첨번호").unwrap().is_none());
        assert!(workbook.open_sheet("../etc/passwd").unwrap().is_none());
        assert!(workbook.open_sheet("").unwrap().is_none());
    }

    #[test]
    fn test_empty_sheet_is_present() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("blank.csv"), "").unwrap();

        let sheet = CsvWorkbook::new(dir.path()).open_sheet("blank").unwrap().unwrap();
        assert!(sheet.rows.is_empty());
        assert_eq!(sheet.values(&CellRange::default()).len(), 5);
    }

    #[test]
    fn test_semicolon_sheet() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("s.csv"), "a;b;1;2;3;4;5;6\n").unwrap();

        let sheet = CsvWorkbook::new(dir.path()).open_sheet("s").unwrap().unwrap();
        let range = CellRange::parse("C1:H1").unwrap();
        assert_eq!(sheet.values(&range)[0][5], CellValue::Number(6.0));
    }
}
