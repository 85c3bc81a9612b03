mod defaults;
mod limits;
mod reasoning;
mod validation;

use crate::cli::Args;
use crate::error::{Result, ThinkStreamError};
use crate::models::ReasoningMarkers;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub use limits::{LimitsConfig, TurnLimits};
pub use reasoning::MarkerConfig;
pub use validation::{expand_env_var_in_string, validate_limits};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub dir: Option<String>,
}

/// Settings as read from a config file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub markers: ReasoningMarkers,
    pub limits: TurnLimits,
    pub verbose: bool,
    pub history_dir: PathBuf,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        let env_vars: HashMap<String, String> = env::vars().collect();
        Self::from_parts(args, file_config, &env_vars)
    }

    /// Merge sources with precedence CLI args > environment > file > defaults.
    pub fn from_parts(
        args: &Args,
        file_config: FileConfig,
        env_vars: &HashMap<String, String>,
    ) -> Result<Self> {
        let env_var = |name: &str| env_vars.get(name).cloned();
        let env_u64 = |name: &str| env_var(name).and_then(|v| v.parse::<u64>().ok());

        let default_markers = ReasoningMarkers::default();
        let open = args
            .open_marker
            .clone()
            .or_else(|| env_var("THINKSTREAM_OPEN_MARKER"))
            .or(file_config.markers.open)
            .unwrap_or(default_markers.open);
        let close = args
            .close_marker
            .clone()
            .or_else(|| env_var("THINKSTREAM_CLOSE_MARKER"))
            .or(file_config.markers.close)
            .unwrap_or(default_markers.close);
        let markers = ReasoningMarkers::new(open, close).map_err(ThinkStreamError::ConfigError)?;

        let default_limits = TurnLimits::default();
        let item_timeout = args
            .item_timeout
            .or_else(|| env_u64("THINKSTREAM_ITEM_TIMEOUT"))
            .or(file_config.limits.item_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(default_limits.item_timeout);
        let max_turn_duration = args
            .max_turn_secs
            .or_else(|| env_u64("THINKSTREAM_MAX_TURN_SECS"))
            .or(file_config.limits.max_turn_secs)
            .map(Duration::from_secs)
            .unwrap_or(default_limits.max_turn_duration);
        let limits = TurnLimits {
            item_timeout,
            max_turn_duration,
            max_buffer_bytes: file_config
                .limits
                .max_buffer_bytes
                .unwrap_or(default_limits.max_buffer_bytes),
            max_tool_calls: file_config
                .limits
                .max_tool_calls
                .unwrap_or(default_limits.max_tool_calls),
        };
        validate_limits(&limits).map_err(ThinkStreamError::ConfigError)?;

        let verbose = args.verbose
            || env_var("THINKSTREAM_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        let history_dir = env_var("THINKSTREAM_HISTORY_DIR")
            .or(file_config.history.dir)
            .unwrap_or_else(defaults::default_history_dir);
        let history_dir = PathBuf::from(expand_env_var_in_string(&history_dir, env_vars));

        Ok(Config {
            markers,
            limits,
            verbose,
            history_dir,
        })
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path)
                    .map_err(|e| ThinkStreamError::ConfigError(format!("{:#}", e)));
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse YAML config file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse JSON config file: {}", path.display())
            })?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".thinkstream.yaml"),
            PathBuf::from(".thinkstream.yml"),
            PathBuf::from(".thinkstream.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("thinkstream");
            paths.push(config_dir.join("thinkstream.yaml"));
            paths.push(config_dir.join("thinkstream.yml"));
            paths.push(config_dir.join("thinkstream.json"));
        }

        paths
    }
}
