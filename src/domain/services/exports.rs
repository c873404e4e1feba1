#[cfg(test)]
#[path = "exports_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;

use super::Sessions;
use crate::domain::models::ChatError;
use crate::domain::models::Document;
use crate::domain::models::ExportFormat;
use crate::infrastructure::exporters::ExporterManager;

/// A rendered export waiting in the exports directory for the user to pick a
/// destination. It must be either saved or discarded.
#[derive(Debug)]
pub struct PendingExport {
    pub session_id: String,
    pub file_name: String,
    pub temp_path: path::PathBuf,
}

impl PendingExport {
    pub async fn save_to(self, destination: &path::Path) -> Result<path::PathBuf> {
        if let Err(err) = move_file(&self.temp_path, destination).await {
            tracing::error!(destination = ?destination, error = ?err, "Failed to save export");
            let temp_path = self.temp_path.to_path_buf();
            if let Err(discard_err) = self.discard().await {
                tracing::warn!(file = ?temp_path, error = ?discard_err, "Failed to remove temporary export");
            }
            return Err(ChatError::ExportSaveFailed {
                path: destination.to_path_buf(),
                reason: err.to_string(),
            }
            .into());
        }

        tracing::debug!(session_id = self.session_id, destination = ?destination, "Exported chat");
        return Ok(destination.to_path_buf());
    }

    pub async fn discard(self) -> Result<()> {
        if self.temp_path.exists() {
            fs::remove_file(&self.temp_path).await?;
            tracing::debug!(file = ?self.temp_path, "Removed temporary export");
        }

        return Ok(());
    }
}

async fn move_file(source: &path::Path, destination: &path::Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    // Renaming fails across filesystems, fall back to copying.
    if fs::rename(source, destination).await.is_err() {
        fs::copy(source, destination).await?;
        fs::remove_file(source).await?;
    }

    return Ok(());
}

pub struct Exports {
    sessions: Sessions,
    pub exports_dir: path::PathBuf,
}

impl Exports {
    pub fn new(sessions: Sessions, exports_dir: path::PathBuf) -> Exports {
        return Exports {
            sessions,
            exports_dir,
        };
    }

    pub async fn document(&self, session_id: &str) -> Result<Document> {
        let has_history = self
            .sessions
            .get_file_path(session_id)
            .map(|file_path| return file_path.exists())
            .unwrap_or(false);
        if !has_history {
            return Err(ChatError::ExportNotFound(format!(
                "session {session_id} has no saved history"
            ))
            .into());
        }

        let session = self.sessions.load(session_id).await?;
        return Ok(Document::from_transcript(&session.id, &session.messages));
    }

    pub async fn render(&self, session_id: &str, format: ExportFormat) -> Result<Vec<u8>> {
        let document = self.document(session_id).await?;
        let bytes = ExporterManager::get(format)
            .render(&document)
            .map_err(|err| return ChatError::ExportRenderFailed(err.to_string()))?;

        return Ok(bytes);
    }

    /// Renders the session into a temporary file inside the exports directory.
    pub async fn prepare(
        &self,
        session_id: Option<&str>,
        format: ExportFormat,
    ) -> Result<PendingExport> {
        let id = match session_id {
            Some(id) => id,
            None => {
                return Err(ChatError::ExportNotFound("no active session".to_string()).into());
            }
        };

        let bytes = self.render(id, format).await?;

        let file_name = format!("{id}.{}", format.extension());
        let temp_path = self.exports_dir.join(&file_name);
        let write_res = async {
            fs::create_dir_all(&self.exports_dir).await?;
            fs::write(&temp_path, bytes).await?;
            return Ok::<(), std::io::Error>(());
        }
        .await;

        if let Err(err) = write_res {
            if temp_path.exists() {
                fs::remove_file(&temp_path).await?;
            }
            return Err(ChatError::ExportRenderFailed(err.to_string()).into());
        }

        return Ok(PendingExport {
            session_id: id.to_string(),
            file_name,
            temp_path,
        });
    }
}
