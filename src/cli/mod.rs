pub mod commands;
pub mod output;
pub mod prompt;
