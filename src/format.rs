//! Display formatting for tool payloads.
//!
//! Formatting is best effort: anything that cannot be parsed is shown as the
//! raw text it arrived as.

use serde::Deserialize;
use serde_json::Value;

pub const EMPTY_RESULT_PLACEHOLDER: &str = "(empty result)";

/// Outcome of formatting a tool result for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    Formatted(String),
    /// Looked structured but did not parse; the raw text is used.
    Fallback { raw: String, reason: String },
    /// Parsed, but rendering the structure failed.
    Failed { error: String },
}

impl FormatOutcome {
    /// Text to show and store for this result.
    pub fn display_text(&self) -> &str {
        match self {
            FormatOutcome::Formatted(text) => text,
            FormatOutcome::Fallback { raw, .. } => raw,
            FormatOutcome::Failed { error } => error,
        }
    }
}

/// Text content item of an MCP tool result.
#[derive(Debug, Deserialize)]
struct ToolContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct McpToolResult {
    content: Vec<ToolContent>,
}

pub fn format_tool_result(content: &str) -> FormatOutcome {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return FormatOutcome::Formatted(EMPTY_RESULT_PLACEHOLDER.to_string());
    }
    if !looks_structured(trimmed) {
        return FormatOutcome::Formatted(content.to_string());
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            return FormatOutcome::Fallback {
                raw: content.to_string(),
                reason: e.to_string(),
            }
        }
    };

    if let Some(text) = mcp_text(&value) {
        return FormatOutcome::Formatted(text);
    }

    match serde_json::to_string_pretty(&value) {
        Ok(pretty) => FormatOutcome::Formatted(pretty),
        Err(e) => FormatOutcome::Failed {
            error: format!("Error: failed to format tool result: {}", e),
        },
    }
}

/// Parse tool-call arguments delivered as a JSON string.
///
/// Returns the value to display and store, plus the parse error when the
/// string was kept as raw text.
pub fn format_tool_args(args: &Value) -> (Value, Option<String>) {
    match args {
        Value::String(raw) if looks_structured(raw.trim()) => {
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(parsed) => (parsed, None),
                Err(e) => (args.clone(), Some(e.to_string())),
            }
        }
        _ => (args.clone(), None),
    }
}

fn looks_structured(text: &str) -> bool {
    text.starts_with('{') || text.starts_with('[')
}

/// Join the text items of an MCP-style `{"content": [...]}` result, or of a
/// bare array of content items.
fn mcp_text(value: &Value) -> Option<String> {
    let items = match value {
        Value::Array(_) => serde_json::from_value::<Vec<ToolContent>>(value.clone()).ok()?,
        Value::Object(_) => serde_json::from_value::<McpToolResult>(value.clone()).ok()?.content,
        _ => return None,
    };

    let texts: Vec<String> = items
        .into_iter()
        .filter(|item| item.content_type == "text")
        .filter_map(|item| item.text)
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}
