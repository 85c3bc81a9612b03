use super::storage::TranscriptStore;
use crate::error::{Result, ThinkStreamError};
use crate::models::Transcript;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "transcript-";

/// Stores each transcript as `transcript-<conversation id>.json` in a directory.
pub struct FilesystemTranscriptStore {
    dir: PathBuf,
}

impl FilesystemTranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            ThinkStreamError::HistoryError(format!(
                "Failed to create history directory {}: {}",
                self.dir.display(),
                e
            ))
        })
    }

    fn transcript_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let files = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().and_then(|e| e.to_str()) == Some("json")
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .map(|n| n.starts_with(FILE_PREFIX))
                        .unwrap_or(false)
            })
            .collect();
        Ok(files)
    }
}

impl TranscriptStore for FilesystemTranscriptStore {
    fn save(&self, transcript: &Transcript) -> Result<()> {
        if transcript.conversation_id.is_empty()
            || transcript
                .conversation_id
                .contains(|c: char| c == '/' || c == '\\' || c == '.')
        {
            return Err(ThinkStreamError::HistoryError(format!(
                "Invalid conversation id for a transcript file: '{}'",
                transcript.conversation_id
            )));
        }

        self.ensure_dir()?;
        let path = self
            .dir
            .join(format!("{}{}.json", FILE_PREFIX, transcript.conversation_id));
        let content = serde_json::to_string_pretty(transcript)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn find_recent(&self) -> Result<Option<Transcript>> {
        // Unreadable or foreign files are skipped rather than failing the lookup
        let mut transcripts: Vec<Transcript> = self
            .transcript_files()?
            .into_iter()
            .filter_map(|path| fs::read_to_string(path).ok())
            .filter_map(|content| serde_json::from_str(&content).ok())
            .collect();

        transcripts.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(transcripts.into_iter().next())
    }

    fn clear_all(&self) -> Result<usize> {
        let files = self.transcript_files()?;
        let count = files.len();
        for path in files {
            fs::remove_file(path)?;
        }
        Ok(count)
    }
}
