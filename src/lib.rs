//! Incremental processing of a tool-using agent's streamed output.
//!
//! Raw [`models::StreamItem`]s flow through the [`stream::ChunkClassifier`]
//! and [`stream::StreamSession`] into a [`conversation::ConversationLog`],
//! while live events go to a [`sink::RenderSink`]. The
//! [`orchestrator`] wires the pieces together for one turn.

pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod feed;
pub mod format;
pub mod history;
pub mod models;
pub mod orchestrator;
pub mod sink;
pub mod stream;
pub mod ui;

pub use error::{Result, ThinkStreamError};
