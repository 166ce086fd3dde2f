//! JSON Schema validation for draw envelopes.
//!
//! The schema (`schemas/draw-response.json`, draft 7) is embedded at compile
//! time. It checks shape only; the `count == games.len()` rule is not
//! expressible in draft 7 and is checked here by hand.
//!
//! ```rust,ignore
//! use serde_json::json;
//! use lottosheet::validate_envelope;
//!
//! let ok = json!({ "success": true, "count": 0, "games": [] });
//! assert!(validate_envelope(&ok).is_ok());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

static DRAW_RESPONSE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/draw-response.json"))
        .unwrap_or(Value::Bool(false))
});

/// Validate `data` against `schema`.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every error otherwise
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a serialized [`crate::DrawResponse`].
pub fn validate_envelope(data: &Value) -> Result<(), Vec<String>> {
    validate(&DRAW_RESPONSE_SCHEMA, data)?;

    if let (Some(count), Some(games)) = (data.get("count"), data.get("games")) {
        let len = games.as_array().map_or(0, Vec::len);
        if count.as_u64() != Some(len as u64) {
            return Err(vec![format!("count is {} but there are {} games", count, len)]);
        }
    }
    Ok(())
}

pub fn is_valid_envelope(data: &Value) -> bool {
    validate_envelope(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::DrawResponse;
    use crate::models::Game;
    use serde_json::json;

    #[test]
    fn test_serialized_envelopes_are_valid() {
        let ok = DrawResponse::success(vec![Game::new(1, vec![1, 2, 3, 4, 5, 6])]);
        let missing = DrawResponse::missing_source("추첨번호");

        assert!(is_valid_envelope(&serde_json::to_value(ok).unwrap()));
        assert!(is_valid_envelope(&serde_json::to_value(missing).unwrap()));
    }

    #[test]
    fn test_rejects_mixed_shape() {
        let mixed = json!({ "success": false, "error": "x", "games": [] });
        assert!(!is_valid_envelope(&mixed));
    }

    #[test]
    fn test_rejects_bad_game() {
        let bad = json!({
            "success": true,
            "count": 1,
            "games": [{ "game": 1, "numbers": [1, 2, 3, 4, 5, 46] }]
        });
        assert!(validate_envelope(&bad).is_err());
    }

    #[test]
    fn test_rejects_wrong_count() {
        let bad = json!({ "success": true, "count": 2, "games": [] });
        let errors = validate_envelope(&bad).unwrap_err();
        assert!(errors[0].contains("count"));
    }

    #[test]
    fn test_generic_validate() {
        let schema = json!({ "type": "object", "required": ["name"] });
        assert!(validate(&schema, &json!({ "name": "x" })).is_ok());
        assert!(validate(&schema, &json!({})).is_err());
    }
}
