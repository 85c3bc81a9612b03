mod log;
mod state;

pub use log::ConversationLog;
pub use state::{ConversationRegistry, ConversationState, TurnGuard};
