//! Shell front end for the transliteration core and the dictionary client.
//!
//! Every command returns its output as a string; `salttool` prints it.

pub mod commands;
mod error;

pub use error::CliError;
