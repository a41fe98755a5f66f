//! Command-line interface for the node binary.

pub mod commands;

pub use commands::{Command, Opt};
