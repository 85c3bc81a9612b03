mod filesystem;
mod storage;

pub use filesystem::FilesystemTranscriptStore;
pub use storage::TranscriptStore;
