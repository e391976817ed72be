//! # SDCP Request Envelope
//!
//! The JSON message the printer expects for every command:
//!
//! ```text
//! {
//!     "Id": "",
//!     "Data": {
//!         "Cmd": 258,
//!         "Data": {"Url": "/local"},
//!         "RequestID": "5f0c6b1e0d8c4e4c9e8c2c4a3b1d9f7a",
//!         "MainboardID": "0a1b2c3d4e5f6a7b",
//!         "TimeStamp": 1718000000000,
//!         "From": 1
//!     }
//! }
//! ```
//!
//! `Id` is a leftover from older firmware. It is always sent empty and may be
//! absent when decoding.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// `From` value marking a client-originated message
pub const FROM_CLIENT: u8 = 1;

/// Top-level request message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Id", default)]
    pub id: String,

    #[serde(rename = "Data")]
    pub data: RequestData,
}

/// Inner request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestData {
    /// Command code
    pub cmd: u32,

    /// Command payload
    pub data: Map<String, Value>,

    /// Fresh per request, 32 hex digits
    #[serde(rename = "RequestID")]
    pub request_id: String,

    /// Target device; the firmware drops messages for other boards
    #[serde(rename = "MainboardID")]
    pub mainboard_id: String,

    /// Milliseconds since the Unix epoch
    pub time_stamp: i64,

    /// Sender role, [`FROM_CLIENT`] for us
    pub from: u8,
}

/// Build a request envelope.
///
/// Pure apart from reading the clock and generating a random request id.
///
/// ## Example
///
/// ```
/// use centauri::protocol::envelope::{build_envelope, FROM_CLIENT};
/// use serde_json::Map;
///
/// let envelope = build_envelope(0, Map::new(), "0a1b2c3d");
/// assert_eq!(envelope.data.cmd, 0);
/// assert_eq!(envelope.data.from, FROM_CLIENT);
/// assert_eq!(envelope.data.request_id.len(), 32);
/// ```
pub fn build_envelope(code: u32, data: Map<String, Value>, mainboard_id: &str) -> Envelope {
    Envelope {
        id: String::new(),
        data: RequestData {
            cmd: code,
            data,
            request_id: new_request_id(),
            mainboard_id: mainboard_id.to_string(),
            time_stamp: Utc::now().timestamp_millis(),
            from: FROM_CLIENT,
        },
    }
}

/// 128-bit random id, lowercase hex without dashes
fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl Envelope {
    pub fn request_id(&self) -> &str {
        &self.data.request_id
    }

    /// Encode for the wire
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from the wire
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn payload() -> Map<String, Value> {
        json!({"Filename": "/local/test.gcode", "StartLayer": 0})
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_wire_field_names() {
        let envelope = build_envelope(128, payload(), "board");
        let wire: Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();

        assert_eq!(wire["Id"], "");
        let data = &wire["Data"];
        assert_eq!(data["Cmd"], 128);
        assert_eq!(data["Data"]["Filename"], "/local/test.gcode");
        assert_eq!(data["MainboardID"], "board");
        assert_eq!(data["From"], 1);
        assert!(data["RequestID"].is_string());
        assert!(data["TimeStamp"].is_i64());
    }

    #[test]
    fn test_request_id_is_hex() {
        let envelope = build_envelope(0, Map::new(), "");
        let id = envelope.request_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_request_ids_unique() {
        let ids: HashSet<String> = (0..10_000)
            .map(|_| build_envelope(1, Map::new(), "board").data.request_id)
            .collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_timestamp_is_current_millis() {
        let before = Utc::now().timestamp_millis();
        let envelope = build_envelope(0, Map::new(), "");
        let after = Utc::now().timestamp_millis();
        assert!(envelope.data.time_stamp >= before && envelope.data.time_stamp <= after);
    }

    #[test]
    fn test_decode_preserves_fields() {
        let envelope = build_envelope(128, payload(), "board");
        let decoded = Envelope::from_json(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_decode_without_legacy_id() {
        let text = r#"{"Data": {"Cmd": 0, "Data": {}, "RequestID": "ab", "MainboardID": "",
                       "TimeStamp": 1, "From": 1}}"#;
        let decoded = Envelope::from_json(text).unwrap();
        assert_eq!(decoded.id, "");
        assert_eq!(decoded.request_id(), "ab");
    }
}
