use std::fmt;

#[derive(Debug)]
pub enum ThinkStreamError {
    /// A turn is already in flight on this conversation.
    Busy {
        conversation_id: String,
    },
    UnknownConversation(String),
    ConfigError(String),
    HistoryError(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl fmt::Display for ThinkStreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThinkStreamError::Busy { conversation_id } => {
                write!(f, "Conversation {} is busy with another turn", conversation_id)
            }
            ThinkStreamError::UnknownConversation(id) => write!(f, "Unknown conversation: {}", id),
            ThinkStreamError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ThinkStreamError::HistoryError(msg) => write!(f, "History error: {}", msg),
            ThinkStreamError::IoError(e) => write!(f, "IO error: {}", e),
            ThinkStreamError::JsonError(e) => write!(f, "JSON error: {}", e),
            ThinkStreamError::YamlError(e) => write!(f, "YAML error: {}", e),
            ThinkStreamError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ThinkStreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ThinkStreamError::IoError(e) => Some(e),
            ThinkStreamError::JsonError(e) => Some(e),
            ThinkStreamError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ThinkStreamError {
    fn from(err: std::io::Error) -> Self {
        ThinkStreamError::IoError(err)
    }
}

impl From<serde_json::Error> for ThinkStreamError {
    fn from(err: serde_json::Error) -> Self {
        ThinkStreamError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for ThinkStreamError {
    fn from(err: serde_yaml::Error) -> Self {
        ThinkStreamError::YamlError(err)
    }
}

impl From<anyhow::Error> for ThinkStreamError {
    fn from(err: anyhow::Error) -> Self {
        ThinkStreamError::Other(format!("{:#}", err))
    }
}

impl From<String> for ThinkStreamError {
    fn from(msg: String) -> Self {
        ThinkStreamError::Other(msg)
    }
}

impl From<&str> for ThinkStreamError {
    fn from(msg: &str) -> Self {
        ThinkStreamError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ThinkStreamError>;
