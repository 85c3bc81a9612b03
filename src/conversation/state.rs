use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::log::ConversationLog;
use crate::error::{Result, ThinkStreamError};
use crate::models::{Message, Transcript};

/// Everything owned by one conversation, passed explicitly to each turn.
#[derive(Debug, Clone)]
pub struct ConversationState {
    id: String,
    log: ConversationLog,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            log: ConversationLog::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ConversationLog {
        &mut self.log
    }

    pub fn to_transcript(&self) -> Transcript {
        Transcript {
            conversation_id: self.id.clone(),
            last_updated: chrono::Local::now(),
            messages: self.log.all().to_vec(),
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to a conversation for the duration of one turn.
pub type TurnGuard = OwnedMutexGuard<ConversationState>;

/// Conversations keyed by id, each behind its own single-writer lock.
#[derive(Default)]
pub struct ConversationRegistry {
    conversations: StdMutex<HashMap<String, Arc<Mutex<ConversationState>>>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh conversation and return its id.
    pub fn create(&self) -> String {
        self.insert(ConversationState::new())
    }

    pub fn insert(&self, state: ConversationState) -> String {
        let id = state.id().to_string();
        self.conversations()
            .insert(id.clone(), Arc::new(Mutex::new(state)));
        id
    }

    pub fn contains(&self, id: &str) -> bool {
        self.conversations().contains_key(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.conversations().keys().cloned().collect()
    }

    /// Claim a conversation for a new turn.
    ///
    /// Fails immediately with [`ThinkStreamError::Busy`] while another turn
    /// holds the conversation; requests are never queued.
    pub fn begin_turn(&self, id: &str) -> Result<TurnGuard> {
        let conversation = self.get(id)?;
        conversation
            .try_lock_owned()
            .map_err(|_| ThinkStreamError::Busy {
                conversation_id: id.to_string(),
            })
    }

    pub fn is_busy(&self, id: &str) -> Result<bool> {
        Ok(self.get(id)?.try_lock().is_err())
    }

    /// Copy of a conversation's messages, waiting for any in-flight turn.
    pub async fn snapshot(&self, id: &str) -> Result<Vec<Message>> {
        let conversation = self.get(id)?;
        let state = conversation.lock().await;
        Ok(state.log().all().to_vec())
    }

    pub fn remove(&self, id: &str) -> bool {
        self.conversations().remove(id).is_some()
    }

    fn get(&self, id: &str) -> Result<Arc<Mutex<ConversationState>>> {
        self.conversations()
            .get(id)
            .cloned()
            .ok_or_else(|| ThinkStreamError::UnknownConversation(id.to_string()))
    }

    fn conversations(&self) -> MutexGuard<'_, HashMap<String, Arc<Mutex<ConversationState>>>> {
        self.conversations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
