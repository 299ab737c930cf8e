//! `backoffice` command-line front end.
//!
//! Loads a JSON dataset into the in-memory store and prints reporting views
//! as JSON, or writes debt reports as CSV files.

pub mod args;
pub mod commands;
pub mod settings;

pub use args::{Cli, Command};
pub use commands::run;
