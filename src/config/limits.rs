use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults::{
    default_item_timeout_secs, default_max_buffer_bytes, default_max_tool_calls,
    default_max_turn_secs,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LimitsConfig {
    #[serde(default)]
    pub item_timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_turn_secs: Option<u64>,
    #[serde(default)]
    pub max_buffer_bytes: Option<usize>,
    #[serde(default)]
    pub max_tool_calls: Option<usize>,
}

/// Bounds applied to a single turn. Exceeding any of them cancels the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnLimits {
    /// Longest wait for the next stream item.
    pub item_timeout: Duration,
    pub max_turn_duration: Duration,
    pub max_buffer_bytes: usize,
    pub max_tool_calls: usize,
}

impl Default for TurnLimits {
    fn default() -> Self {
        Self {
            item_timeout: Duration::from_secs(default_item_timeout_secs()),
            max_turn_duration: Duration::from_secs(default_max_turn_secs()),
            max_buffer_bytes: default_max_buffer_bytes(),
            max_tool_calls: default_max_tool_calls(),
        }
    }
}
