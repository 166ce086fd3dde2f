//! Response envelope returned by the draw endpoint.
//!
//! Exactly two JSON shapes go over the wire:
//!
//! ```text
//! {"success": true,  "count": 3, "games": [{"game": 1, "numbers": [1, 2, 3, 4, 5, 6]}, ...]}
//! {"success": false, "error": "시트 '추첨번호'를 찾을 수 없습니다"}
//! ```
//!
//! `count` is not stored; it is always `games.len()` at serialization time.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::Game;

/// Outcome of one draw request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEnvelope")]
pub enum DrawResponse {
    Success { games: Vec<Game> },
    Failure { error: String },
}

impl DrawResponse {
    /// The configured sheet does not exist.
    pub fn missing_source(sheet: &str) -> Self {
        DrawResponse::Failure {
            error: format!("시트 '{}'를 찾을 수 없습니다", sheet),
        }
    }

    pub fn success(games: Vec<Game>) -> Self {
        DrawResponse::Success { games }
    }

    /// Any other fault, reported by its message.
    pub fn from_error(err: impl fmt::Display) -> Self {
        DrawResponse::Failure { error: err.to_string() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DrawResponse::Success { .. })
    }

    pub fn count(&self) -> Option<usize> {
        self.games().map(<[Game]>::len)
    }

    pub fn games(&self) -> Option<&[Game]> {
        match self {
            DrawResponse::Success { games } => Some(games),
            DrawResponse::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DrawResponse::Success { .. } => None,
            DrawResponse::Failure { error } => Some(error),
        }
    }

    /// Compact JSON body.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            // Game and String always serialize; keep the envelope shape regardless
            format!(r#"{{"success":false,"error":{:?}}}"#, e.to_string())
        })
    }
}

impl Serialize for DrawResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DrawResponse::Success { games } => {
                let mut s = serializer.serialize_struct("DrawResponse", 3)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("count", &games.len())?;
                s.serialize_field("games", games)?;
                s.end()
            }
            DrawResponse::Failure { error } => {
                let mut s = serializer.serialize_struct("DrawResponse", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}

/// Every response is a 200: callers branch on `success`, not on status.
impl IntoResponse for DrawResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Wire form accepted when reading an envelope back.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    games: Option<Vec<Game>>,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<RawEnvelope> for DrawResponse {
    type Error = String;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        if !raw.success {
            return raw
                .error
                .map(|error| DrawResponse::Failure { error })
                .ok_or_else(|| "failure envelope without 'error'".to_string());
        }

        let games = raw.games.ok_or_else(|| "success envelope without 'games'".to_string())?;
        match raw.count {
            Some(count) if count != games.len() => Err(format!(
                "'count' is {} but {} games were sent",
                count,
                games.len()
            )),
            _ => Ok(DrawResponse::Success { games }),
        }
    }
}
