//! The normalized engine reply.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one engine command: `{success, data}` or `{success, error}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body the engine listener answers with.
#[derive(Debug, Deserialize)]
struct ListenerBody {
    #[serde(default)]
    message: Option<String>,
}

impl EngineReply {
    pub fn ok(data: Option<String>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Normalize an HTTP status and body, whichever strategy produced them.
    ///
    /// A 2xx status is success; `data` is the `message` of a JSON listener
    /// body when there is one, otherwise the raw body (`None` when empty).
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        if (200..300).contains(&status) {
            let data = match serde_json::from_str::<ListenerBody>(body) {
                Ok(ListenerBody {
                    message: Some(message),
                }) => Some(message),
                _ if body.is_empty() => None,
                _ => Some(body.to_string()),
            };
            Self::ok(data)
        } else {
            Self::failure(format!("HTTP {status}: {body}"))
        }
    }

    /// The reply as a JSON object, ready to hand to the model.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({ "success": self.success })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_extracts_listener_message() {
        let reply = EngineReply::from_status(200, r#"{"success":true,"message":"Spawned cube."}"#);
        assert!(reply.success);
        assert_eq!(reply.data.as_deref(), Some("Spawned cube."));
        assert!(reply.error.is_none());
    }

    #[test]
    fn test_success_with_plain_body() {
        let reply = EngineReply::from_status(200, "ok\n");
        assert_eq!(reply.data.as_deref(), Some("ok"));
    }

    #[test]
    fn test_success_with_empty_body() {
        let reply = EngineReply::from_status(204, "");
        assert!(reply.success);
        assert!(reply.data.is_none());
    }

    #[test]
    fn test_non_2xx_is_failure() {
        let reply = EngineReply::from_status(400, r#"{"success":false,"message":"Unknown lighting preset: dusk"}"#);
        assert!(!reply.success);
        let err = reply.error.unwrap();
        assert!(err.starts_with("HTTP 400:"));
        assert!(err.contains("Unknown lighting preset"));
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        assert_eq!(
            EngineReply::ok(Some("done".into())).to_value(),
            json!({"success": true, "data": "done"})
        );
        assert_eq!(
            EngineReply::failure("offline").to_value(),
            json!({"success": false, "error": "offline"})
        );
    }
}
