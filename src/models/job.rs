//! Job Entry Model
//!
//! A process the shell keeps track of after handing the terminal back to
//! the user: either it was started in the background, or it was stopped
//! while running in the foreground.

use chrono::{DateTime, Local};
use nix::unistd::Pid;
use std::fmt;

use crate::models::Command;
use crate::parser;

/// One live job in the job table
#[derive(Debug, Clone)]
pub struct JobEntry {
    /// Positive identifier, unique among live jobs
    pub job_id: u32,

    /// Process the job refers to
    pub pid: Pid,

    /// Command line as typed, shown by `jobs`, `fg` and `bg`
    pub command_line: String,

    /// When the job entered the table
    pub created_at: DateTime<Local>,

    /// The command that started the process
    pub command: Command,

    /// Whether the process is currently stopped
    pub stopped: bool,

    /// Whether the job was started or resumed in the background
    pub background: bool,
}

impl JobEntry {
    /// Create an entry; `background` follows the line's trailing marker
    pub fn new(job_id: u32, pid: Pid, command: Command, stopped: bool) -> Self {
        let command_line = command.line().to_string();
        let background = parser::has_background_marker(&command_line);
        Self {
            job_id,
            pid,
            command_line,
            created_at: Local::now(),
            command,
            stopped,
            background,
        }
    }

    /// Mark the job stopped in the foreground
    pub fn mark_stopped(&mut self) {
        self.stopped = true;
        self.background = false;
    }

    /// Clear the stopped flag
    pub fn mark_running(&mut self) {
        self.stopped = false;
    }

    /// Mark the job running again in the background
    pub fn mark_resumed_in_background(&mut self) {
        self.stopped = false;
        self.background = true;
    }
}

impl fmt::Display for JobEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.job_id, self.command_line)?;
        if self.stopped {
            write!(f, " (stopped)")?;
        }
        Ok(())
    }
}
