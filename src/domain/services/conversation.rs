#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::anyhow;
use anyhow::Result;
use tokio::time;
use tokio_util::sync::CancellationToken;

use super::Sessions;
use crate::domain::models::Attachment;
use crate::domain::models::BackendBox;
use crate::domain::models::BackendPrompt;
use crate::domain::models::ChatError;
use crate::domain::models::Message;
use crate::domain::models::ModelName;
use crate::domain::models::Prompt;
use crate::domain::models::PromptMessage;
use crate::domain::models::Role;
use crate::domain::models::Session;

/// Outcome of a single turn. The reply is always present: on a failed model
/// call it carries the error text instead of an answer.
#[derive(Debug)]
pub struct TurnReport {
    pub reply: Message,
    pub failed: bool,
    /// Set when the transcript could not be written. The in-memory transcript
    /// still holds the turn.
    pub persist_error: Option<ChatError>,
}

/// Owns everything that changes during a chat: the active session, the
/// selected model, and the attachment waiting for the next turn.
pub struct Conversation {
    backend: BackendBox,
    sessions: Sessions,
    prompts: Vec<Prompt>,
    model: ModelName,
    timeout: Duration,
    session: Option<Session>,
    pending_attachment: Option<Attachment>,
}

impl Conversation {
    pub fn new(
        backend: BackendBox,
        sessions: Sessions,
        prompts: Vec<Prompt>,
        model: ModelName,
        timeout: Duration,
    ) -> Conversation {
        return Conversation {
            backend,
            sessions,
            prompts,
            model,
            timeout,
            session: None,
            pending_attachment: None,
        };
    }

    pub fn prompts(&self) -> &[Prompt] {
        return &self.prompts;
    }

    pub fn find_prompt(&self, name: &str) -> Option<&Prompt> {
        return self.prompts.iter().find(|e| return e.name == name);
    }

    pub fn model(&self) -> ModelName {
        return self.model;
    }

    pub fn set_model(&mut self, model: ModelName) {
        self.model = model;
    }

    pub fn session(&self) -> Option<&Session> {
        return self.session.as_ref();
    }

    pub fn session_id(&self) -> Option<&str> {
        return self.session.as_ref().map(|e| return e.id.as_str());
    }

    /// Replaces any attachment that is already waiting.
    pub fn attach(&mut self, attachment: Attachment) {
        if let Some(previous) = &self.pending_attachment {
            tracing::debug!(file = previous.file_name(), "Replacing pending attachment");
        }
        self.pending_attachment = Some(attachment);
    }

    pub fn pending_attachment(&self) -> Option<&Attachment> {
        return self.pending_attachment.as_ref();
    }

    pub fn clear_attachment(&mut self) {
        self.pending_attachment = None;
    }

    /// Forgets the active session. The next turn starts a new one.
    pub fn new_session(&mut self) {
        self.session = None;
        self.pending_attachment = None;
    }

    /// Continues a stored session.
    pub async fn resume(&mut self, id: &str) -> Result<()> {
        let session = self.sessions.load(id).await?;
        tracing::debug!(id = id, messages = session.messages.len(), "Resumed session");
        self.session = Some(session);
        self.pending_attachment = None;

        return Ok(());
    }

    async fn ensure_session(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }

        let id = Session::create_id();
        self.sessions
            .create(&id)
            .await
            .map_err(|err| return ChatError::PersistenceFailed(format!("{err:#}")))?;

        tracing::info!(id = id, "Started session");
        self.session = Some(Session::new(&id));

        return Ok(());
    }

    async fn complete(&self, prompt: BackendPrompt, cancel: &CancellationToken) -> Result<String> {
        let timeout = self.timeout;
        let res = tokio::select! {
            _ = cancel.cancelled() => Err(anyhow!("The request was cancelled.")),
            res = time::timeout(timeout, self.backend.get_completion(prompt)) => match res {
                Ok(completion) => completion,
                Err(_) => Err(anyhow!(
                    "The request timed out after {} seconds.",
                    timeout.as_secs_f64()
                )),
            },
        };

        return res;
    }

    /// Sends one turn: system prompt, user text, and the pending attachment.
    ///
    /// The pending attachment is consumed by every call, including calls that
    /// are rejected before reaching the model.
    pub async fn send_turn(
        &mut self,
        prompt_name: &str,
        user_text: &str,
        cancel: &CancellationToken,
    ) -> Result<TurnReport> {
        let attachment = self.pending_attachment.take();

        let text = user_text.trim();
        if text.is_empty() {
            tracing::warn!("Tried to send an empty message");
            return Err(ChatError::EmptyInput.into());
        }

        let prompt = match self.find_prompt(prompt_name) {
            Some(prompt) => prompt.clone(),
            None => {
                tracing::error!(prompt = prompt_name, "Selected prompt not found");
                return Err(ChatError::PromptNotFound(prompt_name.to_string()).into());
            }
        };

        self.ensure_session().await?;

        let request = BackendPrompt::new(self.model, &prompt, text, &attachment);
        let outbound = request.messages.clone();

        tracing::debug!(
            model = %self.model,
            prompt = prompt.name,
            attachment = ?attachment.as_ref().map(|e| return e.kind()),
            "Sending turn"
        );

        let (reply_text, failed) = match self.complete(request, cancel).await {
            Ok(reply) => {
                tracing::debug!("Received reply");
                (reply, false)
            }
            Err(err) => {
                tracing::error!(error = ?err, "Model request failed");
                (ChatError::InferenceCallFailed(format!("{err:#}")).to_string(), true)
            }
        };

        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return Err(anyhow!("No active session")),
        };
        for message in outbound {
            session.append(Message::from(message));
        }
        session.append(Message::from(PromptMessage::text(
            Role::Assistant,
            &reply_text,
        )));

        let reply = match session.messages.last() {
            Some(reply) => reply.clone(),
            None => return Err(anyhow!("Transcript is empty after appending a reply")),
        };

        let mut persist_error = None;
        if let Err(err) = self.sessions.save(&session.id, &session.messages).await {
            tracing::error!(id = %session.id, error = ?err, "Failed to save session");
            persist_error = Some(ChatError::PersistenceFailed(format!("{err:#}")));
        }

        return Ok(TurnReport {
            reply,
            failed,
            persist_error,
        });
    }
}
