//! Interaction analytics CLI library.
//!
//! This crate provides the command-line front end for recording stats into
//! the local analytics database.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
