//! WebSocket message types: envelope and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp. Filled in by the server when a client omits it.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server message stamped with the current time.
    #[must_use]
    pub fn new(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error message carrying `code` and `message`.
    #[must_use]
    pub fn error(id: String, code: u32, message: &str) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send in the payload of a `command` message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to event types.
    Subscribe {
        /// Event type names such as `"tokens_swapped"`. Use `["*"]` for all.
        events: Vec<String>,
    },
    /// Unsubscribe from event types.
    Unsubscribe {
        /// Event type names to drop. `"*"` clears every subscription.
        events: Vec<String>,
    },
    /// Get full pool state.
    GetState,
    /// Get a swap quote (read-only).
    Quote {
        /// Input asset address.
        asset_in: String,
        /// Input amount (string-encoded U256).
        amount_in: String,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn command_envelope_without_timestamp_parses() {
        let text = r#"{"id":"1","type":"command","payload":{"command":"subscribe","events":["*"]}}"#;
        let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
            panic!("envelope must parse");
        };
        assert_eq!(msg.msg_type, WsMessageType::Command);
        let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
            panic!("command must parse");
        };
        assert_eq!(
            command,
            WsCommand::Subscribe {
                events: vec!["*".to_string()]
            }
        );
    }

    #[test]
    fn unit_and_struct_commands_parse() {
        let get_state = serde_json::from_str::<WsCommand>(r#"{"command":"get_state"}"#);
        assert!(matches!(get_state, Ok(WsCommand::GetState)));

        let quote = serde_json::from_str::<WsCommand>(
            r#"{"command":"quote","asset_in":"0x01","amount_in":"10"}"#,
        );
        assert!(matches!(quote, Ok(WsCommand::Quote { .. })));
    }

    #[test]
    fn error_message_serializes_type() {
        let msg = WsMessage::error("7".to_string(), 400, "malformed JSON");
        let Ok(json) = serde_json::to_value(&msg) else {
            panic!("serializable");
        };
        assert_eq!(json["type"], "error");
        assert_eq!(json["payload"]["code"], 400);
    }
}
