use chrono::Local;
use std::fs;
use tempfile::TempDir;
use thinkstream::conversation::ConversationState;
use thinkstream::history::{FilesystemTranscriptStore, TranscriptStore};
use thinkstream::models::{MessageKind, Role, Transcript};

fn create_test_transcript(id: &str, age_minutes: i64) -> Transcript {
    let mut state = ConversationState::with_id(id);
    state
        .log_mut()
        .append(Role::User, MessageKind::Text, "test", None);
    let mut transcript = state.to_transcript();
    transcript.last_updated = Local::now() - chrono::Duration::minutes(age_minutes);
    transcript
}

#[test]
fn test_save_and_find_recent_transcript() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemTranscriptStore::new(temp_dir.path().join("history"));

    store.save(&create_test_transcript("older", 30)).unwrap();
    store.save(&create_test_transcript("newer", 1)).unwrap();

    let found = store.find_recent().unwrap().unwrap();
    assert_eq!(found.conversation_id, "newer");
    assert_eq!(found.messages.len(), 1);
    assert_eq!(found.messages[0].content, "test");
}

#[test]
fn test_find_recent_in_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemTranscriptStore::new(temp_dir.path().join("nothing-here"));
    assert!(store.find_recent().unwrap().is_none());
}

#[test]
fn test_save_overwrites_same_conversation() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemTranscriptStore::new(temp_dir.path());

    store.save(&create_test_transcript("same", 5)).unwrap();
    store.save(&create_test_transcript("same", 0)).unwrap();

    let files = fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(files, 1);
    assert!(temp_dir.path().join("transcript-same.json").exists());
}

#[test]
fn test_invalid_conversation_id_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemTranscriptStore::new(temp_dir.path());

    assert!(store.save(&create_test_transcript("../escape", 0)).is_err());
    assert!(store.save(&create_test_transcript("", 0)).is_err());
}

#[test]
fn test_foreign_files_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemTranscriptStore::new(temp_dir.path());

    fs::write(temp_dir.path().join("transcript-broken.json"), "{not json").unwrap();
    fs::write(temp_dir.path().join("notes.json"), "{}").unwrap();
    store.save(&create_test_transcript("good", 0)).unwrap();

    let found = store.find_recent().unwrap().unwrap();
    assert_eq!(found.conversation_id, "good");
}

#[test]
fn test_clear_all_transcripts() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemTranscriptStore::new(temp_dir.path());

    for i in 0..3 {
        store
            .save(&create_test_transcript(&format!("conv-{}", i), i))
            .unwrap();
    }
    fs::write(temp_dir.path().join("keep.txt"), "unrelated").unwrap();

    assert_eq!(store.clear_all().unwrap(), 3);
    assert!(store.find_recent().unwrap().is_none());
    assert!(temp_dir.path().join("keep.txt").exists());
}
