use std::collections::HashMap;

use super::limits::TurnLimits;

/// Expand `${VAR_NAME}` references using `env`. Unknown variables are kept
/// verbatim.
pub fn expand_env_var_in_string(value: &str, env: &HashMap<String, String>) -> String {
    let mut result = value.to_string();
    let re = match regex::Regex::new(r"\$\{([^}]+)\}") {
        Ok(re) => re,
        Err(_) => return result,
    };

    for cap in re.captures_iter(value) {
        let var_name = &cap[1];
        if let Some(replacement) = env.get(var_name) {
            result = result.replace(&cap[0], replacement);
        }
    }

    result
}

pub fn validate_limits(limits: &TurnLimits) -> Result<(), String> {
    if limits.item_timeout.is_zero() {
        return Err("item timeout must be greater than zero".to_string());
    }
    if limits.max_turn_duration.is_zero() {
        return Err("maximum turn duration must be greater than zero".to_string());
    }
    if limits.max_buffer_bytes == 0 {
        return Err("maximum buffer size must be greater than zero".to_string());
    }
    if limits.max_tool_calls == 0 {
        return Err("maximum tool calls must be greater than zero".to_string());
    }
    Ok(())
}
