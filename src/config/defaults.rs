pub fn default_item_timeout_secs() -> u64 {
    30
}

pub fn default_max_turn_secs() -> u64 {
    600
}

pub fn default_max_buffer_bytes() -> usize {
    1_048_576 // 1MB
}

/// Agent step cap: tool calls allowed in a single turn.
pub fn default_max_tool_calls() -> usize {
    30
}

pub fn default_history_dir() -> String {
    "${HOME}/.cache/thinkstream".to_string()
}
