//! smash - a small Unix shell with job control
//!
//! Reads one command line at a time and runs it: builtins in-process,
//! external programs via fork/exec, two-stage pipelines (`|`, `|&`) and
//! output redirection (`>`, `>>`). Background (`&`) and stopped jobs live
//! in a job table that `jobs`, `fg`, `bg`, `kill` and `quit` operate on.
//!
//! ## Module Organization
//!
//! - [`parser`] - Tokenizing, background markers, operator classification
//! - [`models`] - The parsed [`Command`] and [`JobEntry`]
//! - [`jobs`] - The job table
//! - [`execution`] - fork/exec, pipelines, redirection, `timeout`
//! - [`builtins`] - Commands implemented inside the shell
//! - [`signals`] - Ctrl-Z / Ctrl-C / alarm bridge into the main flow
//! - [`context`] - State shared by all of the above
//! - [`shell`] - Line-level entry point
//! - [`config`] - Configuration loading and validation
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use smash::{Shell, ShellConfig};
//!
//! smash::signals::install_handlers()?;
//! let mut shell = Shell::new(ShellConfig::default());
//! shell.execute_line("echo hello | tr a-z A-Z");
//! # Ok::<(), smash::Error>(())
//! ```

#[macro_use]
extern crate tracing;

pub mod alias;
pub mod builtins;
pub mod config;
pub mod context;
pub mod error;
pub mod execution;
pub mod jobs;
pub mod models;
pub mod parser;
pub mod platform;
pub mod shell;
pub mod signals;

// Re-exports for core functionality
pub use config::{ConfigLoader, ShellConfig};
pub use context::ShellContext;
pub use error::{Error, Result};
pub use jobs::JobTable;
pub use models::{Command, JobEntry};
pub use shell::{CommandBuilder, Shell};

/// The current version of smash from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `default_filter`. Events go to standard error in
/// the compact format so they never mix into redirected output.
pub fn init_logging(default_filter: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let result = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();

    if let Err(e) = result {
        eprintln!("smash: logging already initialized: {}", e);
    }
}
