pub mod classifier;
pub mod session;

pub use classifier::{classify, ChunkClassifier, Classification, Segment};
pub use session::{Mode, SessionEvent, StreamSession};
