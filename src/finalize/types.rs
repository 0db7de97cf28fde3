//! Response envelope returned by the finalize endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of a finalize response.
///
/// `success` and `error` are not checked against each other; a response may
/// carry both and callers must cope with that. Only `success` decides the
/// outcome, so the optional fields decode leniently: a field of the wrong
/// shape becomes `None` instead of rejecting the whole body.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResult {
    /// Missing means the round was not finalized
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<i64>>,
}

/// Winning ticket of a finalized round
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    pub user_id: String,
    pub score: f64,
}

/// Decode a field as `T`, or `None` if it is null or has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_envelope() {
        let body = r#"{
            "success": true,
            "message": "Round closed",
            "winner": {"ticketId": "t-9", "userId": "u1", "score": 42},
            "order": [3, 1, 2]
        }"#;
        let result: FinalizeResult = serde_json::from_str(body).unwrap();
        assert!(result.success);
        assert_eq!(result.message.as_deref(), Some("Round closed"));
        let winner = result.winner.unwrap();
        assert_eq!(winner.ticket_id.as_deref(), Some("t-9"));
        assert_eq!(winner.user_id, "u1");
        assert_eq!(winner.score, 42.0);
        assert_eq!(result.order, Some(vec![3, 1, 2]));
    }

    #[test]
    fn test_decode_winner_without_ticket() {
        let body = r#"{"success": true, "winner": {"userId": "u1", "score": 42}}"#;
        let result: FinalizeResult = serde_json::from_str(body).unwrap();
        let winner = result.winner.unwrap();
        assert!(winner.ticket_id.is_none());
        assert_eq!(winner.user_id, "u1");
    }

    #[test]
    fn test_missing_success_is_false() {
        let result: FinalizeResult = serde_json::from_str(r#"{"error": "no ticket"}"#).unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("no ticket"));
    }

    #[test]
    fn test_success_and_error_may_coexist() {
        let result: FinalizeResult =
            serde_json::from_str(r#"{"success": true, "error": "stale"}"#).unwrap();
        assert!(result.success);
        assert_eq!(result.error.as_deref(), Some("stale"));
    }

    #[test]
    fn test_incomplete_winner_is_dropped() {
        let result: FinalizeResult =
            serde_json::from_str(r#"{"success": true, "winner": {"userId": "u1"}}"#).unwrap();
        assert!(result.success);
        assert!(result.winner.is_none());
    }

    #[test]
    fn test_mistyped_optional_fields_are_dropped() {
        let body = r#"{
            "success": true,
            "message": 12,
            "error": {"code": 3},
            "winner": {"userId": 7, "score": 42},
            "order": [1.5]
        }"#;
        let result: FinalizeResult = serde_json::from_str(body).unwrap();
        assert!(result.success);
        assert!(result.message.is_none());
        assert!(result.error.is_none());
        assert!(result.winner.is_none());
        assert!(result.order.is_none());
    }

    #[test]
    fn test_null_fields_are_none() {
        let result: FinalizeResult =
            serde_json::from_str(r#"{"success": false, "error": null, "order": null}"#).unwrap();
        assert!(result.error.is_none());
        assert!(result.order.is_none());
    }

    #[test]
    fn test_mistyped_success_is_rejected() {
        assert!(serde_json::from_str::<FinalizeResult>(r#"{"success": "yes"}"#).is_err());
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let result = FinalizeResult {
            success: false,
            message: None,
            error: Some("no ticket".to_string()),
            winner: None,
            order: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, serde_json::json!({"success": false, "error": "no ticket"}));
    }
}
