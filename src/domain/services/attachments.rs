#[cfg(test)]
#[path = "attachments_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine;
use tokio::fs;
use tokio::task;

use crate::domain::models::image_media_type;
use crate::domain::models::Attachment;
use crate::domain::models::AttachmentKind;
use crate::domain::models::ChatError;

fn processing_failed(path: &path::Path, err: impl ToString) -> anyhow::Error {
    return ChatError::AttachmentProcessingFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
    .into();
}

fn file_name(path: &path::Path) -> String {
    return path
        .file_name()
        .map(|e| return e.to_string_lossy().to_string())
        .unwrap_or_default();
}

/// Concatenates the text of every page in page order. Pages without text are
/// logged and skipped, only a document that fails to load is an error.
fn extract_pdf_text(path: &path::Path) -> Result<String> {
    let doc = lopdf::Document::load(path)?;
    let mut text = String::new();

    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                if page_text.trim().is_empty() {
                    tracing::warn!(page = page_num, file = ?path, "No text content on PDF page");
                    continue;
                }
                text += &page_text;
            }
            Err(err) => {
                tracing::warn!(page = page_num, file = ?path, error = ?err, "Failed to extract text from PDF page");
            }
        }
    }

    return Ok(text);
}

pub struct Attachments {
    pub dir: path::PathBuf,
}

impl Attachments {
    pub fn new(dir: path::PathBuf) -> Attachments {
        return Attachments { dir };
    }

    /// Copies the file into the attachments directory and processes the copy.
    pub async fn attach(&self, source: &path::Path) -> Result<Attachment> {
        AttachmentKind::from_path(source)?;
        if !source.is_file() {
            return Err(processing_failed(source, "file does not exist"));
        }

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .await
                .map_err(|err| return processing_failed(source, err))?;
        }

        let destination = self.dir.join(file_name(source));
        let same_file = match (fs::canonicalize(source).await, fs::canonicalize(&destination).await) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if !same_file {
            fs::copy(source, &destination)
                .await
                .map_err(|err| return processing_failed(source, err))?;
            tracing::debug!(source = ?source, destination = ?destination, "Copied attachment");
        }

        return Attachments::process(&destination).await;
    }

    pub async fn process(path: &path::Path) -> Result<Attachment> {
        let kind = AttachmentKind::from_path(path)?;

        let attachment = match kind {
            AttachmentKind::Pdf => {
                let pdf_path = path.to_path_buf();
                let text = task::spawn_blocking(move || return extract_pdf_text(&pdf_path))
                    .await
                    .map_err(|err| return processing_failed(path, err))?
                    .map_err(|err| return processing_failed(path, err))?;

                Attachment::Pdf {
                    file_name: file_name(path),
                    text,
                }
            }
            AttachmentKind::Image => {
                let bytes = fs::read(path)
                    .await
                    .map_err(|err| return processing_failed(path, err))?;

                Attachment::Image {
                    file_name: file_name(path),
                    media_type: image_media_type(path).to_string(),
                    data: b64.encode(bytes),
                }
            }
        };

        tracing::debug!(file = ?path, kind = %kind, "Processed attachment");

        return Ok(attachment);
    }
}
