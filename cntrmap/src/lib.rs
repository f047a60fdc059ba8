pub mod command;
pub mod core;
pub mod source;
