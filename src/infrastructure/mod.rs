pub mod backends;
pub mod exporters;
