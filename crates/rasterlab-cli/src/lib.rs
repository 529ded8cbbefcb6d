//! Rasterlab command interpreter.
//!
//! Reads editing commands one line at a time and runs them against a
//! [`rasterlab_core::Session`], printing one outcome line per command:
//!
//! ```text
//! LOAD photo.ppm
//! SELECT 10 10 50 50
//! APPLY SHARPEN
//! SAVE out.ppm ascii
//! EXIT
//! ```
//!
//! # Module Structure
//!
//! - `command` - Text line to typed [`Command`]
//! - `dispatch` - Runs commands and renders their outcome
//! - `config` - Optional YAML settings

pub mod command;
pub mod config;
pub mod dispatch;

pub use command::{Command, CommandError};
pub use config::CliConfig;
pub use dispatch::{Flow, Interpreter, Reply};
