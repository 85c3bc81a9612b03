use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use thinkstream::cli::Args;
use thinkstream::config::{expand_env_var_in_string, Config, FileConfig};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_defaults() {
    let config = Config::from_parts(
        &Args::default(),
        FileConfig::default(),
        &env(&[("HOME", "/home/tester")]),
    )
    .unwrap();

    assert_eq!(config.markers.open, "<think>");
    assert_eq!(config.markers.close, "</think>");
    assert_eq!(config.limits.item_timeout, Duration::from_secs(30));
    assert_eq!(config.limits.max_turn_duration, Duration::from_secs(600));
    assert_eq!(config.limits.max_buffer_bytes, 1_048_576);
    assert_eq!(config.limits.max_tool_calls, 30);
    assert!(!config.verbose);
    assert_eq!(
        config.history_dir,
        PathBuf::from("/home/tester/.cache/thinkstream")
    );
}

#[test]
fn test_precedence_args_over_env_over_file() {
    let file_config: FileConfig = serde_yaml::from_str(
        r#"
markers:
  open: "<file>"
  close: "</file>"
limits:
  item_timeout_secs: 5
  max_turn_secs: 50
  max_tool_calls: 4
session:
  verbose: true
"#,
    )
    .unwrap();

    let args = Args {
        open_marker: Some("<arg>".to_string()),
        ..Args::default()
    };
    let vars = env(&[
        ("THINKSTREAM_OPEN_MARKER", "<env>"),
        ("THINKSTREAM_CLOSE_MARKER", "</env>"),
        ("THINKSTREAM_ITEM_TIMEOUT", "7"),
    ]);

    let config = Config::from_parts(&args, file_config, &vars).unwrap();
    assert_eq!(config.markers.open, "<arg>");
    assert_eq!(config.markers.close, "</env>");
    assert_eq!(config.limits.item_timeout, Duration::from_secs(7));
    assert_eq!(config.limits.max_turn_duration, Duration::from_secs(50));
    assert_eq!(config.limits.max_tool_calls, 4);
    assert!(config.verbose);
}

#[test]
fn test_env_verbose_flag() {
    let config = Config::from_parts(
        &Args::default(),
        FileConfig::default(),
        &env(&[("THINKSTREAM_VERBOSE", "yes")]),
    )
    .unwrap();
    assert!(config.verbose);
}

#[test]
fn test_invalid_markers_are_rejected() {
    let args = Args {
        open_marker: Some("<same>".to_string()),
        close_marker: Some("<same>".to_string()),
        ..Args::default()
    };
    let result = Config::from_parts(&args, FileConfig::default(), &HashMap::new());
    assert!(result.is_err());
}

#[test]
fn test_zero_limits_are_rejected() {
    let args = Args {
        item_timeout: Some(0),
        ..Args::default()
    };
    let result = Config::from_parts(&args, FileConfig::default(), &HashMap::new());
    assert!(result.is_err());
}

#[test]
fn test_load_from_yaml_and_json() {
    let temp_dir = TempDir::new().unwrap();

    let yaml_path = temp_dir.path().join("thinkstream.yaml");
    fs::write(
        &yaml_path,
        "limits:\n  max_buffer_bytes: 2048\nhistory:\n  dir: \"${HOME}/transcripts\"\n",
    )
    .unwrap();
    let yaml = FileConfig::load_from(&yaml_path).unwrap();
    assert_eq!(yaml.limits.max_buffer_bytes, Some(2048));
    assert_eq!(yaml.history.dir.as_deref(), Some("${HOME}/transcripts"));

    let json_path = temp_dir.path().join("thinkstream.json");
    fs::write(&json_path, r#"{"markers": {"open": "[r]", "close": "[/r]"}}"#).unwrap();
    let json = FileConfig::load_from(&json_path).unwrap();
    assert_eq!(json.markers.open.as_deref(), Some("[r]"));
    assert!(json.limits.max_tool_calls.is_none());

    let bad_path = temp_dir.path().join("bad.yaml");
    fs::write(&bad_path, "limits: [unclosed").unwrap();
    assert!(FileConfig::load_from(&bad_path).is_err());
}

#[test]
fn test_expand_env_var_in_string() {
    let vars = env(&[("HOME", "/home/me"), ("APP", "ts")]);
    assert_eq!(
        expand_env_var_in_string("${HOME}/.cache/${APP}", &vars),
        "/home/me/.cache/ts"
    );
    assert_eq!(
        expand_env_var_in_string("${MISSING}/x", &vars),
        "${MISSING}/x"
    );
}

#[test]
fn test_huge_turn_duration_is_accepted() {
    let args = Args {
        max_turn_secs: Some(u64::MAX),
        item_timeout: Some(u64::MAX),
        ..Args::default()
    };
    let config = Config::from_parts(&args, FileConfig::default(), &HashMap::new()).unwrap();
    assert_eq!(
        config.limits.max_turn_duration,
        Duration::from_secs(u64::MAX)
    );
}
