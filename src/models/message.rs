use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub type Metadata = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Reasoning,
    ToolCall,
    ToolResponse,
}

/// One entry of a conversation log.
///
/// Serializes to the persisted shape
/// `{ id, role, kind, content, metadata, createdAt }` with `createdAt` in
/// epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub kind: MessageKind,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Reasoning => "reasoning",
            MessageKind::ToolCall => "tool_call",
            MessageKind::ToolResponse => "tool_response",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to a `tool_call` message.
pub fn tool_call_metadata(tool_name: &str, args: Value) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("tool_name".to_string(), Value::String(tool_name.to_string()));
    metadata.insert("args".to_string(), args);
    metadata
}

/// Metadata attached to a `tool_response` message.
pub fn tool_response_metadata(tool_name: &str, error: bool) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("tool_name".to_string(), Value::String(tool_name.to_string()));
    metadata.insert("error".to_string(), Value::Bool(error));
    metadata
}
