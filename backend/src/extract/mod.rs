//! Game extraction: raw grid rows in, validated games out.
//!
//! Each row is handled on its own:
//!
//! 1. blank cells are dropped
//! 2. the rest are coerced with [`coerce_cell`] (lenient, never fails)
//! 3. values outside 1..=45 are dropped
//! 4. the row becomes a [`Game`] only if exactly six numbers survive
//!
//! Surviving numbers keep their column order. Duplicates are kept unless
//! [`ExtractOptions::reject_duplicates`] is set.

pub mod pipeline;

pub use pipeline::{draw_games, DrawSettings};

use std::fmt;

use crate::models::{in_number_range, CellValue, Game, RawGrid, NUMBERS_PER_GAME};
use crate::parser::coerce_cell;

/// Knobs for [`extract_report`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Drop rows whose six numbers are not pairwise distinct. Off by
    /// default: sheets with repeated numbers are served as they are.
    pub reject_duplicates: bool,
}

/// Why a row produced no game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Number of usable values after filtering, when it isn't six.
    WrongCount(usize),
    /// Six usable values, but some repeat.
    Duplicates,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::WrongCount(0) => write!(f, "no usable numbers"),
            DropReason::WrongCount(n) => {
                write!(f, "{} usable numbers, expected {}", n, NUMBERS_PER_GAME)
            }
            DropReason::Duplicates => write!(f, "repeated numbers"),
        }
    }
}

/// A row that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    /// 1-based row within the grid.
    pub row: u32,
    pub reason: DropReason,
}

/// Games plus the rows that didn't make it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub games: Vec<Game>,
    pub dropped: Vec<DroppedRow>,
}

/// Usable numbers of one row, in column order.
pub fn row_numbers(row: &[CellValue]) -> Vec<u8> {
    row.iter()
        .filter(|cell| !cell.is_empty())
        .filter_map(coerce_cell)
        .filter(|&n| in_number_range(n))
        // in range, so it fits
        .map(|n| n as u8)
        .collect()
}

/// Turn one row into a game, or say why not.
pub fn extract_row(
    position: usize,
    row: &[CellValue],
    options: ExtractOptions,
) -> Result<Game, DroppedRow> {
    let index = u32::try_from(position + 1).unwrap_or(u32::MAX);
    let numbers = row_numbers(row);

    if numbers.len() != NUMBERS_PER_GAME {
        return Err(DroppedRow { row: index, reason: DropReason::WrongCount(numbers.len()) });
    }

    let game = Game::new(index, numbers);
    if options.reject_duplicates && game.has_duplicates() {
        return Err(DroppedRow { row: index, reason: DropReason::Duplicates });
    }
    Ok(game)
}

/// Extract every valid game from `grid`, recording dropped rows.
pub fn extract_report(grid: &RawGrid, options: ExtractOptions) -> ExtractReport {
    let mut report = ExtractReport::default();

    for (position, row) in grid.iter().enumerate() {
        match extract_row(position, row, options) {
            Ok(game) => report.games.push(game),
            Err(dropped) => report.dropped.push(dropped),
        }
    }

    report
}

/// Extract every valid game from `grid` with default options.
pub fn extract_games(grid: &RawGrid) -> Vec<Game> {
    extract_report(grid, ExtractOptions::default()).games
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::grid_from_rows;

    fn sample_grid() -> RawGrid {
        let mut grid = grid_from_rows(vec![
            vec![1i64, 2, 3, 4, 5, 6],
            vec![7, 8, 9, 10, 11, 12],
        ]);
        grid.extend(grid_from_rows(vec![vec![""; 6]]));
        grid.extend(grid_from_rows(vec![
            vec![13i64, 14, 15, 16, 17, 46],
            vec![1, 1, 2, 3, 4, 5],
        ]));
        grid
    }

    #[test]
    fn test_mixed_grid() {
        let games = extract_games(&sample_grid());

        assert_eq!(
            games,
            vec![
                Game::new(1, vec![1, 2, 3, 4, 5, 6]),
                Game::new(2, vec![7, 8, 9, 10, 11, 12]),
                Game::new(5, vec![1, 1, 2, 3, 4, 5]),
            ]
        );
    }

    #[test]
    fn test_report_lists_dropped_rows() {
        let report = extract_report(&sample_grid(), ExtractOptions::default());

        assert_eq!(
            report.dropped,
            vec![
                DroppedRow { row: 3, reason: DropReason::WrongCount(0) },
                DroppedRow { row: 4, reason: DropReason::WrongCount(5) },
            ]
        );
    }

    #[test]
    fn test_reject_duplicates() {
        let options = ExtractOptions { reject_duplicates: true };
        let report = extract_report(&sample_grid(), options);

        assert_eq!(report.games.len(), 2);
        assert_eq!(report.dropped[2], DroppedRow { row: 5, reason: DropReason::Duplicates });
    }

    #[test]
    fn test_lenient_text_cells() {
        let row: Vec<CellValue> = vec!["12abc".into(), "abc".into(), "3".into(), " 4".into(), "5.9".into(), "6".into(), "7x".into()];
        assert_eq!(row_numbers(&row), vec![12, 3, 4, 5, 6, 7]);

        let game = extract_row(0, &row, ExtractOptions::default()).unwrap();
        assert_eq!(game.numbers, vec![12, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_out_of_range_values() {
        let row = grid_from_rows(vec![vec![0i64, -1, 45, 46, 1, 100]]).remove(0);
        assert_eq!(row_numbers(&row), vec![45, 1]);
    }

    #[test]
    fn test_seven_numbers_dropped() {
        let grid = grid_from_rows(vec![vec![1i64, 2, 3, 4, 5, 6, 7]]);
        let report = extract_report(&grid, ExtractOptions::default());

        assert!(report.games.is_empty());
        assert_eq!(report.dropped[0].reason, DropReason::WrongCount(7));
    }

    #[test]
    fn test_ragged_and_empty_grids() {
        assert!(extract_games(&Vec::new()).is_empty());

        let grid = vec![vec![], vec![CellValue::Number(1.0)], grid_from_rows(vec![vec![1i64, 2, 3, 4, 5, 6]]).remove(0)];
        assert_eq!(extract_games(&grid), vec![Game::new(3, vec![1, 2, 3, 4, 5, 6])]);
    }

    #[test]
    fn test_all_rows_empty() {
        let grid = vec![vec![CellValue::Empty; 6]; 5];
        let report = extract_report(&grid, ExtractOptions::default());

        assert!(report.games.is_empty());
        assert_eq!(report.dropped.len(), 5);
    }

    #[test]
    fn test_games_never_exceed_rows_and_indices_increase() {
        let grid = sample_grid();
        let games = extract_games(&grid);

        assert!(games.len() <= grid.len());
        assert!(games.windows(2).all(|w| w[0].index < w[1].index));
        assert!(games.iter().all(Game::is_well_formed));
    }
}
