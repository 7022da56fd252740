//! Configuration management for smash
//!
//! The shell reads a small configuration file at startup: the default
//! prompt, the argument-vector limit, the interpreter used for commands
//! that need glob expansion, and the default log filter.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use loader::ConfigLoader;

/// Name printed before `> ` when no prompt was configured
pub const DEFAULT_PROMPT: &str = "smash";

/// Default upper bound on the number of tokens in one command
pub const DEFAULT_MAX_ARGS: usize = 20;

/// Main configuration structure for smash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt shown on startup and restored by a bare `chprompt`
    pub prompt: String,

    /// Maximum number of tokens a single command may carry
    pub max_args: usize,

    /// Interpreter used as `<interpreter> -c <line>` for glob-bearing commands
    pub interpreter: PathBuf,

    /// Tracing filter used when neither `RUST_LOG` nor `--debug` is given
    pub log_filter: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            max_args: DEFAULT_MAX_ARGS,
            interpreter: PathBuf::from("/bin/bash"),
            log_filter: "off".to_string(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid max_args: {0} (must be at least 1)")]
    InvalidMaxArgs(usize),

    #[error("Interpreter path cannot be empty")]
    EmptyInterpreter,

    #[error("Prompt cannot be empty")]
    EmptyPrompt,
}

impl ShellConfig {
    /// Check the invariants the rest of the shell relies on
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_args == 0 {
            return Err(ConfigError::InvalidMaxArgs(self.max_args));
        }
        if self.interpreter.as_os_str().is_empty() {
            return Err(ConfigError::EmptyInterpreter);
        }
        if self.prompt.trim().is_empty() {
            return Err(ConfigError::EmptyPrompt);
        }
        Ok(())
    }
}
