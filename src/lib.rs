// Pedantic lint configuration for the crate.
// - missing_errors_doc: Error handling is self-evident from Result types
// - missing_panics_doc: Only static regex construction can panic
// - module_name_repetitions: sync::SyncReport and friends read better qualified
// - needless_pass_by_value: SyncContext is consumed on purpose
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value
)]

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod download;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod store;
pub mod sync;
