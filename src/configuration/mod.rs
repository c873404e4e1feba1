mod config;
mod layout;

pub use config::*;
pub use layout::*;
