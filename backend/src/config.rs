//! Runtime settings.
//!
//! Read from the process environment (after `.env` is loaded by the binary):
//!
//! | Variable                        | Default       |
//! |---------------------------------|---------------|
//! | `LOTTOSHEET_WORKBOOK`           | `./workbook`  |
//! | `LOTTOSHEET_SHEET`              | `추첨번호`    |
//! | `LOTTOSHEET_RANGE`              | `C2:H6`       |
//! | `LOTTOSHEET_REJECT_DUPLICATES`  | `false`       |
//! | `PORT`                          | `3000`        |
//! | `SHEET_API_URL`                 | unset         |

use std::env;
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::extract::{DrawSettings, ExtractOptions};
use crate::source::{CellRange, DEFAULT_RANGE, DEFAULT_SHEET};

const DEFAULT_WORKBOOK: &str = "./workbook";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of CSV sheets or a `.json` workbook
    pub workbook: PathBuf,
    pub draw: DrawSettings,
    pub port: u16,
    /// Remote draw endpoint for `lottosheet fetch`
    pub sheet_api_url: Option<String>,
}

impl Config {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_env_with(&[])
    }

    /// Like [`Config::from_env`], with `overrides` taking precedence over the
    /// environment. Overrides are validated the same way.
    pub fn from_env_with(overrides: &[(&str, String)]) -> ConfigResult<Self> {
        Self::from_lookup(|name| {
            overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
                .or_else(|| env::var(name).ok())
        })
    }

    /// Build from any variable lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let range_text = get("LOTTOSHEET_RANGE").unwrap_or_else(|| DEFAULT_RANGE.to_string());
        let range = CellRange::parse(&range_text)?;

        let reject_duplicates = match get("LOTTOSHEET_REJECT_DUPLICATES") {
            Some(v) => parse_flag("LOTTOSHEET_REJECT_DUPLICATES", &v)?,
            None => false,
        };

        let port = match get("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT".to_string(),
                message: format!("'{}' is not a port number", v),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            workbook: PathBuf::from(
                get("LOTTOSHEET_WORKBOOK").unwrap_or_else(|| DEFAULT_WORKBOOK.to_string()),
            ),
            draw: DrawSettings {
                sheet: get("LOTTOSHEET_SHEET").unwrap_or_else(|| DEFAULT_SHEET.to_string()),
                range,
                options: ExtractOptions { reject_duplicates },
            },
            port,
            sheet_api_url: get("SHEET_API_URL"),
        })
    }
}

/// Read only `SHEET_API_URL`, so a bad sheet setting can't block `fetch`.
pub fn sheet_api_url_from_lookup<F>(lookup: F) -> ConfigResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("SHEET_API_URL")
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing("SHEET_API_URL".to_string()))
}

pub fn sheet_api_url_from_env() -> ConfigResult<String> {
    sheet_api_url_from_lookup(|name| env::var(name).ok())
}

fn parse_flag(name: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{}' is not a boolean", other),
        }),
    }
}
