#[cfg(test)]
#[path = "prompts_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;

use crate::domain::models::ChatError;
use crate::domain::models::Prompt;

pub struct LoadedPrompts {
    pub prompts: Vec<Prompt>,
    /// Files that were found but could not be read. Each one is a
    /// `ChatError::PromptLoadFailed`.
    pub skipped: Vec<ChatError>,
}

pub struct PromptCatalog {
    pub dir: path::PathBuf,
}

impl PromptCatalog {
    pub fn new(dir: path::PathBuf) -> PromptCatalog {
        return PromptCatalog { dir };
    }

    pub async fn list(&self) -> Result<LoadedPrompts> {
        if !self.dir.is_dir() {
            tracing::error!(dir = ?self.dir, "Prompt directory not found");
            return Err(ChatError::PromptDirectoryMissing(self.dir.to_path_buf()).into());
        }

        let mut prompts: Vec<Prompt> = vec![];
        let mut skipped: Vec<ChatError> = vec![];

        let mut dir = fs::read_dir(&self.dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            let file_path = entry.path();
            let is_txt = file_path
                .extension()
                .map(|e| return e == "txt")
                .unwrap_or(false);
            if !is_txt || !file_path.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            match fs::read_to_string(&file_path).await {
                Ok(content) => {
                    tracing::debug!(name = name, "Loaded prompt");
                    prompts.push(Prompt { name, content });
                }
                Err(err) => {
                    tracing::warn!(name = name, error = ?err, "Failed to load prompt file");
                    skipped.push(ChatError::PromptLoadFailed {
                        name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        prompts.sort_by(|a, b| return a.name.cmp(&b.name));

        return Ok(LoadedPrompts { prompts, skipped });
    }
}
