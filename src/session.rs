//! Conversation session state, persisted per project as JSON.
//!
//! A `Session` is an explicit value: operations mutate it in memory and the
//! caller persists it with `save` at defined checkpoints. Nothing here saves
//! as a hidden side effect, so a crashed turn leaves the file at the previous
//! checkpoint rather than half-written.

use crate::error::{Error, Result, SessionError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Conversation and research state for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Free-form state label, e.g. "idle" or "research_complete".
    #[serde(default = "default_state")]
    pub current_state: String,
    #[serde(default)]
    pub research_data: HashMap<String, ResearchEntry>,
    #[serde(default)]
    pub conversation: Vec<ConversationEntry>,
}

fn default_state() -> String {
    "idle".to_string()
}

/// Research findings recorded for a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchEntry {
    pub topic: String,
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

/// One turn of the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Session {
    /// Create a fresh session for a project.
    pub fn new(project_name: &str) -> Self {
        let now = Utc::now();
        Self {
            project_name: project_name.to_string(),
            created_at: now,
            last_updated: now,
            current_state: default_state(),
            research_data: HashMap::new(),
            conversation: Vec::new(),
        }
    }

    /// Load a session from file, or start a fresh one if the file is absent.
    pub fn load_or_new(path: &Path, project_name: &str) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(project_name));
        }

        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            Error::Session(SessionError::CorruptedData {
                path: path.display().to_string(),
                details: e.to_string(),
            })
        })
    }

    /// Persist the session. Write goes to a temp file first, then renames,
    /// so a failed write leaves the previous checkpoint intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            Error::Session(SessionError::CorruptedData {
                path: path.display().to_string(),
                details: e.to_string(),
            })
        })?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Record a user turn.
    pub fn record_user(&mut self, content: &str) {
        self.push_entry(Role::User, content);
    }

    /// Record an assistant turn.
    pub fn record_assistant(&mut self, content: &str) {
        self.push_entry(Role::Assistant, content);
    }

    fn push_entry(&mut self, role: Role, content: &str) {
        self.conversation.push(ConversationEntry {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        });
        self.last_updated = Utc::now();
    }

    /// Store research findings under a topic, replacing any earlier entry.
    pub fn add_research(&mut self, topic: &str, content: &str) {
        self.research_data.insert(
            topic.to_string(),
            ResearchEntry {
                topic: topic.to_string(),
                content: content.to_string(),
                recorded_at: Utc::now(),
            },
        );
        self.current_state = "research_complete".to_string();
        self.last_updated = Utc::now();
    }

    /// Research findings for a topic, if recorded.
    pub fn research(&self, topic: &str) -> Option<&ResearchEntry> {
        self.research_data.get(topic)
    }

    /// The most recent `limit` conversation entries, oldest first.
    pub fn recent_conversation(&self, limit: usize) -> &[ConversationEntry] {
        let start = self.conversation.len().saturating_sub(limit);
        &self.conversation[start..]
    }

    /// Plain-text summary of the session for prompt context: state, research
    /// topics, and the tail of the conversation.
    pub fn context_summary(&self) -> String {
        let mut summary = format!("Current state: {}", self.current_state);

        if !self.research_data.is_empty() {
            let mut topics: Vec<&str> = self
                .research_data
                .keys()
                .map(String::as_str)
                .collect();
            topics.sort_unstable();
            summary.push_str("\nResearch topics:");
            for topic in topics {
                summary.push_str(&format!("\n  - {}", topic));
            }
        }

        let recent = self.recent_conversation(6);
        if !recent.is_empty() {
            summary.push_str("\nRecent conversation:");
            for entry in recent {
                let role = match entry.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                summary.push_str(&format!("\n  {}: {}", role, entry.content));
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_idle() {
        let session = Session::new("demo");
        assert_eq!(session.project_name, "demo");
        assert_eq!(session.current_state, "idle");
        assert!(session.conversation.is_empty());
        assert!(session.research_data.is_empty());
    }

    #[test]
    fn test_record_turns() {
        let mut session = Session::new("demo");
        session.record_user("hello");
        session.record_assistant("hi there");

        assert_eq!(session.conversation.len(), 2);
        assert_eq!(session.conversation[0].role, Role::User);
        assert_eq!(session.conversation[1].role, Role::Assistant);
        assert_eq!(session.conversation[1].content, "hi there");
    }

    #[test]
    fn test_add_research_updates_state() {
        let mut session = Session::new("demo");
        session.add_research("rust adoption", "lots of it");

        assert_eq!(session.current_state, "research_complete");
        assert_eq!(session.research("rust adoption").unwrap().content, "lots of it");
        assert!(session.research("unknown topic").is_none());
    }

    #[test]
    fn test_recent_conversation_limits() {
        let mut session = Session::new("demo");
        for i in 0..10 {
            session.record_user(&format!("message {}", i));
        }

        let recent = session.recent_conversation(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].content, "message 7");
        assert_eq!(recent[2].content, "message 9");
    }

    #[test]
    fn test_context_summary_lists_topics_and_tail() {
        let mut session = Session::new("demo");
        session.add_research("bees", "buzz");
        session.record_user("tell me about bees");

        let summary = session.context_summary();
        assert!(summary.contains("Current state: research_complete"));
        assert!(summary.contains("- bees"));
        assert!(summary.contains("user: tell me about bees"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("session.json");

        let mut session = Session::new("demo");
        session.record_user("hello");
        session.add_research("topic", "findings");
        session.save(&path).unwrap();

        let loaded = Session::load_or_new(&path, "demo").unwrap();
        assert_eq!(loaded.project_name, "demo");
        assert_eq!(loaded.conversation.len(), 1);
        assert_eq!(loaded.research("topic").unwrap().content, "findings");
    }

    #[test]
    fn test_load_missing_file_starts_fresh() {
        let temp_dir = tempfile::tempdir().unwrap();
        let session =
            Session::load_or_new(&temp_dir.path().join("session.json"), "demo").unwrap();
        assert_eq!(session.project_name, "demo");
        assert!(session.conversation.is_empty());
    }

    #[test]
    fn test_load_corrupted_file_is_named_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "not json at all").unwrap();

        let err = Session::load_or_new(&path, "demo").unwrap_err();
        assert!(matches!(err, Error::Session(_)));
    }
}
