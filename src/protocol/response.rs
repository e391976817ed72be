//! # Printer Replies
//!
//! Replies are treated as opaque JSON. The only structure we rely on:
//!
//! ```text
//! {
//!     "Id": "...",
//!     "Data": {
//!         "Cmd": 258,
//!         "Data": {"Ack": 0, "FileList": [...]},   <- inner payload
//!         "RequestID": "...",                      <- echoes the request
//!         ...
//!     },
//!     "Topic": "sdcp/response/..."
//! }
//! ```

use serde_json::Value;

/// Field holding the acknowledgment code in the inner payload
pub const ACK_FIELD: &str = "Ack";

/// How replies are returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The full reply, untouched
    #[default]
    Raw,
    /// Just the inner payload, without `Ack`
    Clean,
}

impl OutputMode {
    pub fn apply(self, reply: Value) -> Value {
        match self {
            Self::Raw => reply,
            Self::Clean => clean_response(reply),
        }
    }
}

/// Reduce a reply to its inner payload.
///
/// - `Data.Data` is an object: returned without `Ack`
/// - `Data.Data` is any other value: returned as is
/// - `Data.Data` is absent: the whole reply comes back unchanged
pub fn clean_response(reply: Value) -> Value {
    match reply.get("Data").and_then(|outer| outer.get("Data")) {
        Some(Value::Object(inner)) => {
            let mut inner = inner.clone();
            inner.remove(ACK_FIELD);
            Value::Object(inner)
        }
        Some(inner) => inner.clone(),
        None => reply,
    }
}

/// `Data.RequestID` of a reply, when present
pub fn reply_request_id(reply: &Value) -> Option<&str> {
    reply
        .get("Data")
        .and_then(|outer| outer.get("RequestID"))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_strips_ack() {
        let reply = json!({"Data": {"Data": {"Ack": 0, "Status": "ok"}}});
        assert_eq!(clean_response(reply), json!({"Status": "ok"}));
    }

    #[test]
    fn test_clean_scalar_passthrough() {
        let reply = json!({"Data": {"Data": 42}});
        assert_eq!(clean_response(reply), json!(42));
    }

    #[test]
    fn test_clean_falls_back_to_raw() {
        let reply = json!({"Status": {"CurrentStatus": [0]}});
        assert_eq!(clean_response(reply.clone()), reply);

        let reply = json!({"Data": "not an object"});
        assert_eq!(clean_response(reply.clone()), reply);

        let reply = json!([1, 2, 3]);
        assert_eq!(clean_response(reply.clone()), reply);
    }

    #[test]
    fn test_raw_mode_untouched() {
        let reply = json!({"Data": {"Data": {"Ack": 0}}});
        assert_eq!(OutputMode::Raw.apply(reply.clone()), reply);
        assert_eq!(OutputMode::Clean.apply(reply), json!({}));
    }

    #[test]
    fn test_reply_request_id() {
        let reply = json!({"Data": {"RequestID": "abc", "Data": {}}});
        assert_eq!(reply_request_id(&reply), Some("abc"));
        assert_eq!(reply_request_id(&json!({"Data": {}})), None);
        assert_eq!(reply_request_id(&json!({"Data": {"RequestID": 7}})), None);
    }
}
