mod attachment;
mod backend;
mod document;
mod error;
mod exporter;
mod message;
mod model;
mod prompt;
mod session;
mod slash_commands;

pub use attachment::*;
pub use backend::*;
pub use document::*;
pub use error::*;
pub use exporter::*;
pub use message::*;
pub use model::*;
pub use prompt::*;
pub use session::*;
pub use slash_commands::*;
