use std::path::PathBuf;

/// Every failure the chat flow distinguishes. Operations return
/// `anyhow::Result`, callers recover the kind with `downcast_ref::<ChatError>()`.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Missing required configuration '{key}'. Set it with --{key} or the {env} environment variable.")]
    ConfigurationMissing { key: String, env: String },

    #[error("Prompt directory {} does not exist.", .0.display())]
    PromptDirectoryMissing(PathBuf),

    #[error("No prompts found in {}. Add at least one .txt file.", .0.display())]
    NoPromptsFound(PathBuf),

    #[error("Failed to load prompt file '{name}': {reason}")]
    PromptLoadFailed { name: String, reason: String },

    #[error("Unsupported file type '{0}'. Supported types are pdf, png, jpg and jpeg.")]
    UnsupportedFileType(String),

    #[error("Failed to process attachment '{}': {reason}", .path.display())]
    AttachmentProcessingFailed { path: PathBuf, reason: String },

    #[error("Prompt '{0}' not found.")]
    PromptNotFound(String),

    #[error("Please enter a message.")]
    EmptyInput,

    #[error("An error occurred while contacting the model: {0}")]
    InferenceCallFailed(String),

    #[error("Failed to save the chat history: {0}")]
    PersistenceFailed(String),

    #[error("No session found for id {0}")]
    SessionNotFound(String),

    #[error("Invalid session id '{0}'. Session ids are hyphenated v4 UUIDs.")]
    InvalidSessionId(String),

    #[error("There is no chat history to export: {0}.")]
    ExportNotFound(String),

    #[error("Failed to render the export: {0}")]
    ExportRenderFailed(String),

    #[error("Failed to save the export to {}: {reason}", .path.display())]
    ExportSaveFailed { path: PathBuf, reason: String },
}
