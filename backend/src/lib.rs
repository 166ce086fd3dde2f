//! # Lottosheet - lottery games from a spreadsheet range
//!
//! Reads a fixed block of cells (by default `C2:H6` of sheet `추첨번호`),
//! keeps every row that holds exactly six numbers in 1..=45, and serves the
//! result as a JSON envelope.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ GridSource  │────▶│  RawGrid    │────▶│  Extractor  │────▶│DrawResponse │
//! │ (CSV/JSON)  │     │ (range A1)  │     │ (6 × 1..45) │     │   (JSON)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lottosheet::{draw_games, open_workbook, DrawSettings};
//!
//! let workbook = open_workbook("./workbook");
//! let response = draw_games(workbook.as_ref(), &DrawSettings::default());
//! println!("{}", response.to_json());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Environment settings
//! - [`models`] - Cells, grids and games
//! - [`parser`] - Lenient coercion and CSV decoding
//! - [`source`] - Grid sources and A1 ranges
//! - [`extract`] - Game extraction and the request pipeline
//! - [`api`] - HTTP API server
//! - [`client`] - Client for a deployed endpoint
//! - [`validation`] - Envelope schema checks

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Reading
pub mod parser;
pub mod source;

// Extraction
pub mod extract;

// Validation
pub mod validation;

// HTTP
pub mod api;
pub mod client;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{ClientError, ConfigError, GridError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CellValue, Game, RawGrid, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_GAME};

// =============================================================================
// Re-exports - Sources
// =============================================================================

pub use source::{
    open_workbook, CellRange, CsvWorkbook, GridSource, JsonWorkbook, MemoryWorkbook, Sheet,
    DEFAULT_RANGE, DEFAULT_SHEET,
};

// =============================================================================
// Re-exports - Extraction
// =============================================================================

pub use extract::{
    draw_games, extract_games, extract_report, DrawSettings, DropReason, DroppedRow,
    ExtractOptions, ExtractReport,
};
pub use parser::{coerce_cell, parse_leading_int};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::DrawResponse;
pub use client::SheetApiClient;
pub use config::Config;
pub use validation::{is_valid_envelope, validate_envelope};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
