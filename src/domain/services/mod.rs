mod attachments;
mod conversation;
mod exports;
mod prompts;
mod sessions;

pub use attachments::*;
pub use conversation::*;
pub use exports::*;
pub use prompts::*;
pub use sessions::*;
