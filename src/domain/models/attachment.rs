#[cfg(test)]
#[path = "attachment_test.rs"]
mod tests;

use std::path::Path;

use super::ChatError;
use super::ContentPart;
use super::ImageUrl;
use super::MessageContent;
use super::PromptMessage;
use super::Role;

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AttachmentKind {
    Pdf,
    Image,
}

impl AttachmentKind {
    /// Resolves the kind from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<AttachmentKind, ChatError> {
        let ext = path
            .extension()
            .map(|e| return e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => return Ok(AttachmentKind::Pdf),
            "png" | "jpg" | "jpeg" => return Ok(AttachmentKind::Image),
            _ => {
                let name = path
                    .file_name()
                    .map(|e| return e.to_string_lossy().to_string())
                    .unwrap_or_default();
                return Err(ChatError::UnsupportedFileType(name));
            }
        }
    }
}

pub fn image_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| return e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if ext == "png" {
        return "image/png";
    }

    return "image/jpeg";
}

/// A processed file waiting to be sent along with the next turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attachment {
    Pdf {
        file_name: String,
        text: String,
    },
    Image {
        file_name: String,
        media_type: String,
        data: String,
    },
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        match self {
            Attachment::Pdf { .. } => return AttachmentKind::Pdf,
            Attachment::Image { .. } => return AttachmentKind::Image,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Attachment::Pdf { file_name, .. } => return file_name,
            Attachment::Image { file_name, .. } => return file_name,
        }
    }

    /// The extra user message carrying the attachment to the model.
    pub fn to_prompt_message(&self) -> PromptMessage {
        match self {
            Attachment::Pdf { text, .. } => {
                return PromptMessage::text(
                    Role::User,
                    &format!("Here's the content of the attached PDF:\n{text}"),
                );
            }
            Attachment::Image {
                media_type, data, ..
            } => {
                return PromptMessage::new(
                    Role::User,
                    MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: "Here's an attached image:".to_string(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: format!("data:{media_type};base64,{data}"),
                            },
                        },
                    ]),
                );
            }
        }
    }
}
