#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;

use super::Attachment;
use super::ModelName;
use super::Prompt;
use super::PromptMessage;
use super::Role;

/// The full outbound request for one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendPrompt {
    pub model: ModelName,
    pub messages: Vec<PromptMessage>,
}

impl BackendPrompt {
    /// System prompt, user text, and at most one attachment message, in that
    /// order.
    pub fn new(
        model: ModelName,
        prompt: &Prompt,
        text: &str,
        attachment: &Option<Attachment>,
    ) -> BackendPrompt {
        let mut messages = vec![
            PromptMessage::text(Role::System, &prompt.content),
            PromptMessage::text(Role::User, text),
        ];

        if let Some(attachment) = attachment {
            messages.push(attachment.to_prompt_message());
        }

        return BackendPrompt { model, messages };
    }
}

#[async_trait]
pub trait Backend {
    /// Used at startup to verify all configurations are available to work with
    /// the backend.
    async fn health_check(&self) -> Result<()>;

    /// Requests a single, complete reply for the prompt. Only the first choice
    /// returned by the backend is used.
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
