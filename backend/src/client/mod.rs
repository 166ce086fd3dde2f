//! Client for a deployed draw endpoint.
//!
//! Purchasing tools read their manual picks from the sheet through this
//! endpoint instead of opening the workbook themselves.
//!
//! ```rust,ignore
//! let client = SheetApiClient::new("https://example.test/exec");
//! for game in client.fetch_games().await? {
//!     println!("{}: {:?}", game.index, game.numbers);
//! }
//! ```

use std::time::Duration;

use crate::api::types::DrawResponse;
use crate::error::{ClientError, ClientResult};
use crate::models::Game;

/// Request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct SheetApiClient {
    url: String,
    http: reqwest::Client,
}

impl SheetApiClient {
    pub fn new(url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { url: url.into(), http }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw envelope.
    pub async fn fetch(&self) -> ClientResult<DrawResponse> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Http(format!("HTTP {}: {}", status, truncate(&body, 200))));
        }

        parse_envelope(&body)
    }

    /// Fetch the games, turning a failure envelope into [`ClientError::Remote`].
    pub async fn fetch_games(&self) -> ClientResult<Vec<Game>> {
        games_from(self.fetch().await?)
    }
}

/// Decode a response body into an envelope.
pub fn parse_envelope(body: &str) -> ClientResult<DrawResponse> {
    serde_json::from_str(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

/// Unwrap a success envelope, re-checking every game.
pub fn games_from(response: DrawResponse) -> ClientResult<Vec<Game>> {
    match response {
        DrawResponse::Failure { error } => Err(ClientError::Remote(error)),
        DrawResponse::Success { games } => {
            if let Some(bad) = games.iter().find(|g| !g.is_well_formed()) {
                return Err(ClientError::InvalidResponse(format!(
                    "game {} is not six numbers in 1..=45: {:?}",
                    bad.index, bad.numbers
                )));
            }
            Ok(games)
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body() {
        let body = r#"{"success":true,"count":1,"games":[{"game":3,"numbers":[5,10,15,20,25,30]}]}"#;
        let games = games_from(parse_envelope(body).unwrap()).unwrap();
        assert_eq!(games, vec![Game::new(3, vec![5, 10, 15, 20, 25, 30])]);
    }

    #[test]
    fn test_failure_body() {
        let body = r#"{"success":false,"error":"시트 '추첨번호'를 찾을 수 없습니다"}"#;
        let err = games_from(parse_envelope(body).unwrap()).unwrap_err();
        assert!(matches!(err, ClientError::Remote(ref m) if m.contains("추첨번호")));
    }

    #[test]
    fn test_malformed_games_rejected() {
        let body = r#"{"success":true,"count":1,"games":[{"game":1,"numbers":[1,2,3]}]}"#;
        let err = games_from(parse_envelope(body).unwrap()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[test]
    fn test_non_envelope_body() {
        assert!(matches!(
            parse_envelope("<html>Sign in</html>"),
            Err(ClientError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("추첨번호", 2), "추첨");
        assert_eq!(truncate("ok", 10), "ok");
    }
}
