use serde::{Deserialize, Serialize};

use super::tool::ToolCallRequest;

/// One item of the feed produced by the agent runtime.
///
/// Items are tagged by `type`; tags this crate does not know deserialize to
/// [`StreamItem::Unknown`] so the feed keeps flowing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamItem {
    AssistantChunk {
        #[serde(default)]
        content: String,
        #[serde(default)]
        tool_calls: Vec<ToolCallRequest>,
    },
    ToolResult {
        tool_name: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        is_error: bool,
    },
    #[serde(other)]
    Unknown,
}

impl StreamItem {
    pub fn text(content: impl Into<String>) -> Self {
        StreamItem::AssistantChunk {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_result(tool_name: impl Into<String>, content: impl Into<String>, is_error: bool) -> Self {
        StreamItem::ToolResult {
            tool_name: tool_name.into(),
            content: content.into(),
            is_error,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            StreamItem::AssistantChunk { .. } => "assistant_chunk",
            StreamItem::ToolResult { .. } => "tool_result",
            StreamItem::Unknown => "unknown",
        }
    }
}
