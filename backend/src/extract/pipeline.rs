//! One draw request, end to end.
//!
//! ```text
//! GridSource ──open_sheet──▶ Sheet ──values(range)──▶ RawGrid ──extract──▶ DrawResponse
//! ```
//!
//! [`draw_games`] never fails: a missing sheet, a read fault or even a panic
//! inside a grid source all come back as a failure envelope.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::{extract_report, ExtractOptions};
use crate::api::logs::RequestLog;
use crate::api::types::DrawResponse;
use crate::error::GridResult;
use crate::source::{CellRange, GridSource, DEFAULT_SHEET};

/// What to read and how strictly to validate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSettings {
    /// Sheet name, matched exactly
    pub sheet: String,
    /// Block holding one game per row
    pub range: CellRange,
    pub options: ExtractOptions,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            sheet: DEFAULT_SHEET.to_string(),
            range: CellRange::default(),
            options: ExtractOptions::default(),
        }
    }
}

/// Read the configured range from `source` and build the envelope.
pub fn draw_games(source: &dyn GridSource, settings: &DrawSettings) -> DrawResponse {
    draw_games_logged(source, settings, &RequestLog::new())
}

/// Same as [`draw_games`], logging under an existing request id.
pub fn draw_games_logged(
    source: &dyn GridSource,
    settings: &DrawSettings,
    log: &RequestLog,
) -> DrawResponse {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(source, settings, log)));

    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            log.error(format!("Failed to read grid: {}", e));
            DrawResponse::from_error(e)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log.error(format!("Grid source panicked: {}", message));
            DrawResponse::from_error(message)
        }
    }
}

fn run(
    source: &dyn GridSource,
    settings: &DrawSettings,
    log: &RequestLog,
) -> GridResult<DrawResponse> {
    log.info(format!("📖 Opening sheet '{}'", settings.sheet));

    let Some(sheet) = source.open_sheet(&settings.sheet)? else {
        log.warning(format!("Sheet '{}' not found", settings.sheet));
        return Ok(DrawResponse::missing_source(&settings.sheet));
    };

    let grid = sheet.values(&settings.range);
    log.success(format!("Read {} rows from {}", grid.len(), settings.range));

    let report = extract_report(&grid, settings.options);
    for dropped in &report.dropped {
        log.info_indent(format!("Row {} skipped: {}", dropped.row, dropped.reason), 1);
    }
    log.success(format!("{} games ready", report.games.len()));

    Ok(DrawResponse::success(report.games))
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected internal error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use crate::models::Game;
    use crate::source::{grid_from_rows, MemoryWorkbook, Sheet};
    use serde_json::json;

    /// The sheet as users lay it out: labels in A:B, numbers in C:H.
    fn workbook() -> MemoryWorkbook {
        let mut rows = grid_from_rows(vec![vec!["회차", "", "1", "2", "3", "4", "5", "6"]]);
        rows.extend(grid_from_rows(vec![
            vec!["A", "자동", "1", "2", "3", "4", "5", "6"],
            vec!["B", "수동", "7", "8", "9", "10", "11", "12"],
            vec!["C", "", "", "", "", "", "", ""],
            vec!["D", "", "13", "14", "15", "16", "17", "46"],
            vec!["E", "", "1", "1", "2", "3", "4", "5"],
            vec!["F", "", "20", "21", "22", "23", "24", "25"],
        ]));
        MemoryWorkbook::new().with_sheet(DEFAULT_SHEET, rows)
    }

    struct Failing;

    impl GridSource for Failing {
        fn open_sheet(&self, _name: &str) -> GridResult<Option<Sheet>> {
            Err(GridError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "range read timed out",
            )))
        }
    }

    struct Panicking;

    impl GridSource for Panicking {
        fn open_sheet(&self, _name: &str) -> GridResult<Option<Sheet>> {
            panic!("cell cache poisoned");
        }
    }

    #[test]
    fn test_reads_default_range_only() {
        let response = draw_games(&workbook(), &DrawSettings::default());

        // row F sits below C2:H6 and is never read
        assert_eq!(
            response,
            DrawResponse::success(vec![
                Game::new(1, vec![1, 2, 3, 4, 5, 6]),
                Game::new(2, vec![7, 8, 9, 10, 11, 12]),
                Game::new(5, vec![1, 1, 2, 3, 4, 5]),
            ])
        );
        assert_eq!(response.count(), Some(3));
    }

    #[test]
    fn test_missing_sheet() {
        let response = draw_games(&MemoryWorkbook::new(), &DrawSettings::default());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "success": false, "error": "시트 '추첨번호'를 찾을 수 없습니다" })
        );
    }

    #[test]
    fn test_empty_sheet_is_success() {
        let source = MemoryWorkbook::new().with_sheet(DEFAULT_SHEET, Vec::new());
        let response = draw_games(&source, &DrawSettings::default());
        assert_eq!(response, DrawResponse::success(Vec::new()));
    }

    #[test]
    fn test_read_fault_becomes_failure() {
        let response = draw_games(&Failing, &DrawSettings::default());
        assert_eq!(response.error(), Some("Failed to read workbook: range read timed out"));
    }

    #[test]
    fn test_panic_becomes_failure() {
        let response = draw_games(&Panicking, &DrawSettings::default());
        assert_eq!(response.error(), Some("cell cache poisoned"));
    }

    #[test]
    fn test_custom_sheet_and_range() {
        let source = MemoryWorkbook::new()
            .with_sheet("picks", grid_from_rows(vec![vec![45i64, 44, 43, 42, 41, 40]]));
        let settings = DrawSettings {
            sheet: "picks".to_string(),
            range: CellRange::parse("A1:F1").unwrap(),
            options: ExtractOptions { reject_duplicates: true },
        };

        let response = draw_games(&source, &settings);
        assert_eq!(response.games().unwrap(), &[Game::new(1, vec![45, 44, 43, 42, 41, 40])]);
    }
}
