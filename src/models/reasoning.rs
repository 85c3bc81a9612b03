use serde::{Deserialize, Serialize};

pub const DEFAULT_OPEN_MARKER: &str = "<think>";
pub const DEFAULT_CLOSE_MARKER: &str = "</think>";

/// Literal strings delimiting a reasoning block in the agent's text output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningMarkers {
    pub open: String,
    pub close: String,
}

impl ReasoningMarkers {
    /// Build a marker pair, rejecting empty or identical markers.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self, String> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() || close.is_empty() {
            return Err("reasoning markers must not be empty".to_string());
        }
        if open == close {
            return Err(format!(
                "opening and closing reasoning markers must differ (both are '{}')",
                open
            ));
        }
        Ok(Self { open, close })
    }
}

impl Default for ReasoningMarkers {
    fn default() -> Self {
        Self {
            open: DEFAULT_OPEN_MARKER.to_string(),
            close: DEFAULT_CLOSE_MARKER.to_string(),
        }
    }
}
