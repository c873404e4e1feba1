#[cfg(test)]
#[path = "document_test.rs"]
mod tests;

use super::Message;
use super::Role;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParagraphStyle {
    /// User input, set apart from replies.
    Quote,
    Normal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub text: String,
}

/// Format-neutral export of a transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn from_transcript(session_id: &str, messages: &[Message]) -> Document {
        let paragraphs = messages
            .iter()
            .filter_map(|message| {
                match message.role {
                    Role::System => return None,
                    Role::User => {
                        return Some(Paragraph {
                            style: ParagraphStyle::Quote,
                            text: format!("User: {}", message.text()),
                        });
                    }
                    Role::Assistant => {
                        return Some(Paragraph {
                            style: ParagraphStyle::Normal,
                            text: format!("Assistant: {}", message.text()),
                        });
                    }
                }
            })
            .collect::<Vec<Paragraph>>();

        return Document {
            title: format!("Chat Session: {session_id}"),
            paragraphs,
        };
    }
}
