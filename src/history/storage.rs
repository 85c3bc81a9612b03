use crate::error::Result;
use crate::models::Transcript;

/// Trait for transcript storage backends
pub trait TranscriptStore: Send + Sync {
    /// Save (or overwrite) a transcript
    fn save(&self, transcript: &Transcript) -> Result<()>;

    /// Most recently updated transcript, if any
    fn find_recent(&self) -> Result<Option<Transcript>>;

    /// Remove every stored transcript
    fn clear_all(&self) -> Result<usize>;
}
