#[cfg(test)]
#[path = "repl_test.rs"]
mod tests;

use std::io;
use std::path;
use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;
use owo_colors::Stream;
use strum::IntoEnumIterator;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::configuration::Layout;
use crate::domain::models::Backend;
use crate::domain::models::BackendBox;
use crate::domain::models::ChatError;
use crate::domain::models::ExportFormat;
use crate::domain::models::ModelName;
use crate::domain::models::Prompt;
use crate::domain::models::SlashCommand;
use crate::domain::services::Attachments;
use crate::domain::services::Conversation;
use crate::domain::services::Exports;
use crate::domain::services::PromptCatalog;
use crate::domain::services::Sessions;
use crate::domain::services::TurnReport;
use crate::infrastructure::backends::openai::OpenAI;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /attach (/a) [PATH] - Attaches a PDF, PNG or JPEG file to your next message.
- /detach (/d) - Removes the pending attachment.
- /prompts (/pl) - Lists all available prompts.
- /prompt (/p) [PROMPT_NAME] - Sets the system prompt used for your next messages.
- /models (/ml) - Lists all available models.
- /model (/m) [MODEL_NAME] - Sets the active model.
- /new (/n) - Starts a new conversation.
- /session (/s) - Prints the active session ID.
- /export (/e) [docx,markdown] - Exports the active conversation. Defaults to docx.
- /quit /exit (/q) - Exit chatdesk.
- /help (/h) - Provides this help menu.

HOTKEYS:
- CTRL+C - Cancel waiting for a response if in progress, otherwise exit.
        "#;

    return text.trim().to_string();
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Falls back to the first prompt when nothing, or an unknown name, is
/// configured.
fn initial_prompt(prompts: &[Prompt], configured: &str) -> String {
    if prompts.iter().any(|e| return e.name == configured) {
        return configured.to_string();
    }

    if !configured.is_empty() {
        tracing::warn!(prompt = configured, "Configured prompt not found");
    }

    return prompts
        .first()
        .map(|e| return e.name.to_string())
        .unwrap_or_default();
}

fn strip_quotes(text: &str) -> &str {
    let text = text.trim();
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }

    return text;
}

pub struct Repl<R, W> {
    conversation: Conversation,
    attachments: Attachments,
    exports: Exports,
    prompt_name: String,
    input: R,
    output: W,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: io::Write,
{
    pub fn new(
        conversation: Conversation,
        attachments: Attachments,
        exports: Exports,
        prompt_name: &str,
        input: R,
        output: W,
    ) -> Repl<R, W> {
        return Repl {
            conversation,
            attachments,
            exports,
            prompt_name: prompt_name.to_string(),
            input,
            output,
        };
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }

        return Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()));
    }

    fn print_info(&mut self, text: &str) -> Result<()> {
        writeln!(
            self.output,
            "{}",
            text.if_supports_color(Stream::Stdout, |e| return e.cyan())
        )?;
        return Ok(());
    }

    fn print_warning(&mut self, text: &str) -> Result<()> {
        writeln!(
            self.output,
            "{}",
            text.if_supports_color(Stream::Stdout, |e| return e.yellow())
        )?;
        return Ok(());
    }

    fn print_error(&mut self, err: &anyhow::Error) -> Result<()> {
        let text = format!("{err:#}");
        writeln!(
            self.output,
            "{}",
            text.if_supports_color(Stream::Stdout, |e| return e.red())
        )?;
        return Ok(());
    }

    fn print_welcome(&mut self) -> Result<()> {
        let mut text = format!(
            "chatdesk {}. Prompt: {}, model: {}.",
            env!("CARGO_PKG_VERSION"),
            self.prompt_name,
            self.conversation.model()
        );

        if let Some(session) = self.conversation.session() {
            text = format!(
                "{text}\nResumed session {} with {} messages.",
                session.id,
                session.messages.len()
            );
        }

        self.print_info(&format!("{text}\nType /help for the list of commands."))?;
        return Ok(());
    }

    fn print_report(&mut self, report: TurnReport) -> Result<()> {
        let text = report.reply.text();
        if report.failed {
            writeln!(
                self.output,
                "{}",
                text.if_supports_color(Stream::Stdout, |e| return e.red())
            )?;
        } else {
            writeln!(
                self.output,
                "{} {text}",
                "Assistant:".if_supports_color(Stream::Stdout, |e| return e.green())
            )?;
        }

        if let Some(err) = report.persist_error {
            self.print_warning(&format!("Warning: {err}"))?;
        }

        return Ok(());
    }

    /// Reads lines until EOF, `/quit`, or CTRL+C while waiting for input.
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome()?;

        loop {
            write!(
                self.output,
                "{} ",
                ">".if_supports_color(Stream::Stdout, |e| return e.bold())
            )?;
            self.output.flush()?;

            let line = tokio::select! {
                line = self.read_line() => line?,
                _ = signal::ctrl_c() => None,
            };

            let line = match line {
                Some(line) => line,
                None => {
                    writeln!(self.output)?;
                    break;
                }
            };

            if self.handle_line(&line).await? == Flow::Quit {
                break;
            }
        }

        self.print_info("Goodbye!")?;
        return Ok(());
    }

    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if line.trim().starts_with('/') {
            if let Some(cmd) = SlashCommand::parse(line) {
                return self.handle_command(cmd).await;
            }

            self.print_warning(&format!(
                "Unknown command {}. Type /help for the list of commands.",
                line.trim()
            ))?;
            return Ok(Flow::Continue);
        }

        self.send(line).await?;
        return Ok(Flow::Continue);
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        let cancel = CancellationToken::new();
        let watcher_cancel = cancel.clone();
        let watcher = tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                watcher_cancel.cancel();
            }
        });

        let res = self
            .conversation
            .send_turn(&self.prompt_name, text, &cancel)
            .await;
        watcher.abort();

        match res {
            Ok(report) => self.print_report(report)?,
            Err(err) => self.print_error(&err)?,
        }

        return Ok(());
    }

    async fn handle_command(&mut self, cmd: SlashCommand) -> Result<Flow> {
        if cmd.is_quit() {
            return Ok(Flow::Quit);
        }

        if cmd.is_help() {
            writeln!(self.output, "{}", help_text())?;
        } else if cmd.is_attach() {
            self.attach(strip_quotes(&cmd.arg_text())).await?;
        } else if cmd.is_detach() {
            if self.conversation.pending_attachment().is_some() {
                self.conversation.clear_attachment();
                self.print_info("Removed the pending attachment.")?;
            } else {
                self.print_info("There is no pending attachment.")?;
            }
        } else if cmd.is_prompt_list() {
            let lines = self
                .conversation
                .prompts()
                .iter()
                .map(|e| {
                    if e.name == self.prompt_name {
                        return format!("* {}", e.name);
                    }
                    return format!("  {}", e.name);
                })
                .collect::<Vec<String>>();
            writeln!(self.output, "{}", lines.join("\n"))?;
        } else if cmd.is_prompt_set() {
            let name = cmd.arg_text();
            if self.conversation.find_prompt(&name).is_some() {
                self.prompt_name = name;
                self.print_info(&format!("Prompt set to {}.", self.prompt_name))?;
            } else {
                self.print_error(&ChatError::PromptNotFound(name).into())?;
            }
        } else if cmd.is_model_list() {
            let lines = ModelName::iter()
                .map(|e| {
                    if e == self.conversation.model() {
                        return format!("* {e}");
                    }
                    return format!("  {e}");
                })
                .collect::<Vec<String>>();
            writeln!(self.output, "{}", lines.join("\n"))?;
        } else if cmd.is_model_set() {
            let name = cmd.arg_text();
            if let Some(model) = ModelName::parse(&name) {
                self.conversation.set_model(model);
                self.print_info(&format!("Model set to {model}."))?;
            } else {
                let models = ModelName::iter()
                    .map(|e| return e.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                self.print_warning(&format!(
                    "Unknown model '{name}'. Available models are: {models}"
                ))?;
            }
        } else if cmd.is_new_session() {
            self.conversation.new_session();
            self.print_info("Started a new conversation.")?;
        } else if cmd.is_session() {
            let text = match self.conversation.session_id() {
                Some(id) => format!("Session ID: {id}"),
                None => "No active session yet. Send a message to start one.".to_string(),
            };
            self.print_info(&text)?;
        } else if cmd.is_export() {
            self.export(&cmd.arg_text()).await?;
        }

        return Ok(Flow::Continue);
    }

    async fn attach(&mut self, file_path: &str) -> Result<()> {
        if file_path.is_empty() {
            self.print_warning("Usage: /attach PATH")?;
            return Ok(());
        }

        match self.attachments.attach(path::Path::new(file_path)).await {
            Ok(attachment) => {
                self.print_info(&format!(
                    "Attached {} ({}). It will be sent with your next message.",
                    attachment.file_name(),
                    attachment.kind()
                ))?;
                self.conversation.attach(attachment);
            }
            Err(err) => {
                self.print_error(&err)?;
            }
        }

        return Ok(());
    }

    async fn export(&mut self, format_text: &str) -> Result<()> {
        let format = if format_text.trim().is_empty() {
            ExportFormat::default()
        } else if let Some(format) = ExportFormat::parse(format_text) {
            format
        } else {
            self.print_warning(&format!(
                "Unknown export format '{}'. Use docx or markdown.",
                format_text.trim()
            ))?;
            return Ok(());
        };

        let pending = match self
            .exports
            .prepare(self.conversation.session_id(), format)
            .await
        {
            Ok(pending) => pending,
            Err(err) => {
                self.print_error(&err)?;
                return Ok(());
            }
        };

        write!(
            self.output,
            "Save {} to (leave empty to cancel): ",
            pending.file_name
        )?;
        self.output.flush()?;

        let answer = self.read_line().await?.unwrap_or_default();
        let answer = strip_quotes(&answer);
        if answer.is_empty() {
            pending.discard().await?;
            self.print_info("Export cancelled.")?;
            return Ok(());
        }

        let mut destination = path::PathBuf::from(answer);
        if destination.is_dir() {
            destination = destination.join(&pending.file_name);
        }

        match pending.save_to(&destination).await {
            Ok(saved) => self.print_info(&format!("Chat exported to {}", saved.display()))?,
            Err(err) => self.print_error(&err)?,
        }

        return Ok(());
    }
}

/// Wires configuration, services and the OpenAI backend together and runs the
/// interactive loop on stdin and stdout.
pub async fn start() -> Result<()> {
    if Config::get(ConfigKey::ApiKey).is_empty() {
        return Err(ChatError::ConfigurationMissing {
            key: ConfigKey::ApiKey.to_string(),
            env: "OPENAI_API_KEY".to_string(),
        }
        .into());
    }

    let layout = Layout::default();
    layout.ensure().await?;

    let loaded = PromptCatalog::new(layout.prompts_dir.to_path_buf())
        .list()
        .await?;
    for skipped in &loaded.skipped {
        eprintln!(
            "{}",
            format!("Warning: {skipped}").if_supports_color(Stream::Stderr, |e| return e.yellow())
        );
    }
    if loaded.prompts.is_empty() {
        return Err(ChatError::NoPromptsFound(layout.prompts_dir).into());
    }

    let backend: BackendBox = Box::<OpenAI>::default();
    if let Err(err) = backend.health_check().await {
        tracing::warn!(error = ?err, "Backend health check failed");
        eprintln!(
            "{}",
            format!("Warning: {err:#}").if_supports_color(Stream::Stderr, |e| return e.yellow())
        );
    }

    let model = ModelName::parse(&Config::get(ConfigKey::Model)).unwrap_or_default();
    let prompt_name = initial_prompt(&loaded.prompts, &Config::get(ConfigKey::Prompt));
    let timeout = Duration::from_millis(Config::get(ConfigKey::RequestTimeout).parse::<u64>()?);

    let sessions = Sessions::new(layout.sessions_dir.to_path_buf());
    let mut conversation = Conversation::new(
        backend,
        sessions.clone(),
        loaded.prompts,
        model,
        timeout,
    );

    let session_id = Config::get(ConfigKey::SessionID);
    if !session_id.is_empty() {
        conversation.resume(&session_id).await?;
    }

    tracing::info!(prompt = prompt_name, model = %model, "Starting chat");

    let mut repl = Repl::new(
        conversation,
        Attachments::new(layout.attachments_dir.to_path_buf()),
        Exports::new(sessions, layout.exports_dir.to_path_buf()),
        &prompt_name,
        BufReader::new(tokio::io::stdin()),
        io::stdout(),
    );

    return repl.run().await;
}
