//! Core data models for smash
//!
//! Parsed commands and the job entries that outlive them.

pub mod command;
pub mod job;

// Re-exports for convenience
pub use command::{
    BuiltinCommand, BuiltinKind, Command, ExternalCommand, PipeSource, PipelineCommand,
    RedirectMode, RedirectionCommand,
};
pub use job::JobEntry;
