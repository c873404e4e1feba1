#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;

use super::Config;
use super::ConfigKey;

/// Directories derived from the data directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub prompts_dir: path::PathBuf,
    pub sessions_dir: path::PathBuf,
    pub exports_dir: path::PathBuf,
    pub attachments_dir: path::PathBuf,
}

impl Default for Layout {
    fn default() -> Layout {
        return Layout::from_data_dir(&path::PathBuf::from(Config::get(ConfigKey::DataDir)));
    }
}

impl Layout {
    pub fn from_data_dir(data_dir: &path::Path) -> Layout {
        return Layout {
            prompts_dir: data_dir.join("prompts"),
            sessions_dir: data_dir.join("chat_history"),
            exports_dir: data_dir.join("exported_chats"),
            attachments_dir: data_dir.join("attachments"),
        };
    }

    /// Creates every directory the app writes to. The prompts directory is
    /// user managed and left alone.
    pub async fn ensure(&self) -> Result<()> {
        for dir in [
            &self.sessions_dir,
            &self.exports_dir,
            &self.attachments_dir,
        ] {
            fs::create_dir_all(dir).await?;
        }

        tracing::debug!(
            sessions = ?self.sessions_dir,
            exports = ?self.exports_dir,
            attachments = ?self.attachments_dir,
            "Ensured data directories"
        );

        return Ok(());
    }
}
