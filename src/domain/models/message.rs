#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Either plain text, or a list of parts mixing text and embedded images.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flattens the content to display text. Images are shown as `[image]`.
    pub fn as_text(&self) -> String {
        match self {
            MessageContent::Text(text) => return text.to_string(),
            MessageContent::Parts(parts) => {
                return parts
                    .iter()
                    .map(|part| {
                        match part {
                            ContentPart::Text { text } => return text.to_string(),
                            ContentPart::ImageUrl { .. } => return "[image]".to_string(),
                        }
                    })
                    .collect::<Vec<String>>()
                    .join("\n");
            }
        }
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        return MessageContent::Text(text.to_string());
    }
}

/// A message as sent to the model, without any bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl PromptMessage {
    pub fn new(role: Role, content: MessageContent) -> PromptMessage {
        return PromptMessage { role, content };
    }

    pub fn text(role: Role, text: &str) -> PromptMessage {
        return PromptMessage::new(role, text.into());
    }
}

/// A transcript entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: MessageContent) -> Message {
        return Message {
            role,
            content,
            timestamp: Utc::now(),
        };
    }

    pub fn text(&self) -> String {
        return self.content.as_text();
    }
}

impl From<PromptMessage> for Message {
    fn from(val: PromptMessage) -> Self {
        return Message::new(val.role, val.content);
    }
}
