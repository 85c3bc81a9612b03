mod message;
mod reasoning;
mod stream_item;
mod tool;
mod transcript;

pub use message::{tool_call_metadata, tool_response_metadata, Message, MessageKind, Metadata, Role};
pub use reasoning::ReasoningMarkers;
pub use stream_item::StreamItem;
pub use tool::ToolCallRequest;
pub use transcript::Transcript;
