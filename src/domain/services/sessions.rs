#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::models::ChatError;
use crate::domain::models::Message;
use crate::domain::models::Session;
use crate::domain::models::SessionSummary;

const HISTORY_FILE: &str = "history.json";

/// On-disk transcripts, one directory per session id.
#[derive(Clone)]
pub struct Sessions {
    pub cache_dir: path::PathBuf,
}

impl Sessions {
    pub fn new(cache_dir: path::PathBuf) -> Sessions {
        return Sessions { cache_dir };
    }

    fn get_dir_path(&self, id: &str) -> Result<path::PathBuf> {
        Session::parse_id(id)?;
        return Ok(self.cache_dir.join(id));
    }

    pub fn get_file_path(&self, id: &str) -> Result<path::PathBuf> {
        return Ok(self.get_dir_path(id)?.join(HISTORY_FILE));
    }

    /// Transcripts are written as a JSON array indented by four spaces, with
    /// non-ASCII characters kept as is.
    pub fn serialize(messages: &[Message]) -> Result<Vec<u8>> {
        let mut payload: Vec<u8> = vec![];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut payload, formatter);
        messages.serialize(&mut serializer)?;

        return Ok(payload);
    }

    pub async fn create(&self, id: &str) -> Result<()> {
        let dir = self.get_dir_path(id)?;
        fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = ?dir, "Created session directory");

        return Ok(());
    }

    pub async fn save(&self, id: &str, messages: &[Message]) -> Result<()> {
        let dir = self.get_dir_path(id)?;
        let payload = Sessions::serialize(messages)?;

        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
        }

        let file_path = dir.join(HISTORY_FILE);
        let mut file = fs::File::create(&file_path).await?;
        file.write_all(&payload).await?;
        file.flush().await?;

        tracing::debug!(file = ?file_path, messages = messages.len(), "Saved session");

        return Ok(());
    }

    pub async fn load(&self, id: &str) -> Result<Session> {
        let file_path = match self.get_file_path(id) {
            Ok(file_path) if file_path.exists() => file_path,
            _ => return Err(ChatError::SessionNotFound(id.to_string()).into()),
        };

        let payload = fs::read_to_string(file_path).await?;
        let messages: Vec<Message> = serde_json::from_str(&payload)?;

        return Ok(Session {
            id: id.to_string(),
            messages,
        });
    }

    /// Returns every readable session, oldest activity first.
    pub async fn list(&self) -> Result<Vec<SessionSummary>> {
        let mut sessions: Vec<SessionSummary> = vec![];
        if !self.cache_dir.exists() {
            return Ok(sessions);
        }

        let mut dir = fs::read_dir(&self.cache_dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            if !entry.path().is_dir() {
                continue;
            }

            let id = entry.file_name().to_string_lossy().to_string();
            match self.load(&id).await {
                Ok(session) => sessions.push(SessionSummary::from(&session)),
                Err(err) => {
                    tracing::warn!(id = id, error = ?err, "Skipping unreadable session");
                }
            }
        }

        sessions.sort_by(|a, b| {
            return a.updated.cmp(&b.updated).then_with(|| return a.id.cmp(&b.id));
        });

        return Ok(sessions);
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let dir = match self.get_dir_path(id) {
            Ok(dir) if dir.is_dir() => dir,
            _ => return Err(ChatError::SessionNotFound(id.to_string()).into()),
        };

        fs::remove_dir_all(&dir).await?;
        tracing::debug!(dir = ?dir, "Deleted session");

        return Ok(());
    }

    pub async fn delete_all(&self) -> Result<()> {
        if !self.cache_dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&self.cache_dir).await?;
        return Ok(());
    }
}
