#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::ChatError;
use super::Message;
use super::Role;

/// The active conversation: a stable id and its ordered transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn new(id: &str) -> Session {
        return Session {
            id: id.to_string(),
            messages: vec![],
        };
    }

    pub fn create_id() -> String {
        return Uuid::new_v4().to_string();
    }

    /// Session ids double as directory names, so only the hyphenated v4 form
    /// created by `create_id` is accepted.
    pub fn parse_id(id: &str) -> Result<Uuid, ChatError> {
        match Uuid::parse_str(id) {
            Ok(uuid) if id.len() == 36 && uuid.get_version_num() == 4 => return Ok(uuid),
            _ => return Err(ChatError::InvalidSessionId(id.to_string())),
        }
    }

    /// Appends a message, never letting the transcript go back in time.
    pub fn append(&mut self, mut message: Message) {
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }

        self.messages.push(message);
    }
}

/// A stored session, reduced to what a listing needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: String,
    pub updated: Option<DateTime<Utc>>,
    pub preview: String,
    pub message_count: usize,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        let preview = session
            .messages
            .iter()
            .find(|e| return e.role == Role::User)
            .map(|e| return e.text())
            .unwrap_or_default();

        return SessionSummary {
            id: session.id.to_string(),
            updated: session.messages.last().map(|e| return e.timestamp),
            preview,
            message_count: session.messages.len(),
        };
    }
}
