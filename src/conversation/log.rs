use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Message, MessageKind, Metadata, Role};

/// Ordered, append-only message store for one conversation.
///
/// Ids start at 1 and increase by one per successful append. Messages are
/// only ever handed out by shared reference.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    messages: Vec<Message>,
    next_id: u64,
    last_created: Option<DateTime<Utc>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            last_created: None,
        }
    }

    /// Append a message. Empty content is ignored and returns `None`.
    pub fn append(
        &mut self,
        role: Role,
        kind: MessageKind,
        content: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> Option<&Message> {
        let content = content.into();
        if content.is_empty() {
            return None;
        }

        // Wall clocks can step backwards; keep createdAt non-decreasing.
        let now = Utc::now();
        let created_at = match self.last_created {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created = Some(created_at);

        let message = Message {
            id: self.next_id,
            role,
            kind,
            content,
            metadata: metadata.unwrap_or_default(),
            created_at,
        };
        self.next_id += 1;
        self.messages.push(message);
        self.messages.last()
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message and restart ids at 1.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.next_id = 1;
        self.last_created = None;
    }

    /// Serialize the log in its persisted shape.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.messages)?)
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}
