use serde::{Deserialize, Serialize};

use super::message::Message;

/// A stored snapshot of one conversation's log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub conversation_id: String,
    pub last_updated: chrono::DateTime<chrono::Local>,
    pub messages: Vec<Message>,
}
