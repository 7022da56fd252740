//! Shell context
//!
//! Everything the executor, the builtins and the signal bridge share:
//! prompt, job table, previous directory, alias table, pending timeouts,
//! and the foreground-job record. It is created once by [`crate::Shell`]
//! and passed by `&mut` to every component that needs it.

use nix::unistd::Pid;
use std::path::PathBuf;
use std::sync::Arc;

use crate::alias::AliasTable;
use crate::config::ShellConfig;
use crate::execution::timeout::TimeoutRegistry;
use crate::jobs::JobTable;
use crate::models::Command;
use crate::platform::{Platform, ProcessOps};

/// The process the shell is currently blocked on
#[derive(Debug, Clone)]
pub struct ForegroundJob {
    pub pid: Pid,
    /// Copy of the command that started it, filed into the job table if it stops
    pub command: Command,
}

/// Process-wide shell state
#[derive(Debug)]
pub struct ShellContext {
    /// Current prompt (printed as `<prompt>> `)
    pub prompt: String,

    /// Background and stopped jobs
    pub jobs: JobTable,

    /// Directory before the last successful `cd`
    pub last_dir: Option<PathBuf>,

    /// Process id of the shell itself
    pub shell_pid: Pid,

    /// Alias name -> replacement text
    pub aliases: AliasTable,

    /// Deadlines registered by `timeout`
    pub timeouts: TimeoutRegistry,

    /// Startup configuration
    pub config: ShellConfig,

    foreground: Option<ForegroundJob>,
}

impl ShellContext {
    /// Create a context backed by the real OS
    pub fn new(config: ShellConfig) -> Self {
        Self::with_ops(config, Platform::process())
    }

    /// Create a context backed by the given process operations
    pub fn with_ops(config: ShellConfig, ops: Arc<dyn ProcessOps>) -> Self {
        Self {
            prompt: config.prompt.clone(),
            jobs: JobTable::with_ops(ops),
            last_dir: None,
            shell_pid: nix::unistd::getpid(),
            aliases: AliasTable::new(),
            timeouts: TimeoutRegistry::new(),
            config,
            foreground: None,
        }
    }

    /// Process operations shared with the job table
    pub fn ops(&self) -> Arc<dyn ProcessOps> {
        Arc::clone(self.jobs.ops())
    }

    /// Record the process the shell is about to wait on
    pub fn set_foreground(&mut self, pid: Pid, command: Command) {
        trace!("foreground <- pid {}", pid);
        self.foreground = Some(ForegroundJob { pid, command });
    }

    /// Forget the foreground record
    pub fn clear_foreground(&mut self) {
        if let Some(fg) = self.foreground.take() {
            trace!("foreground cleared (was pid {})", fg.pid);
        }
    }

    /// The current foreground job, if any
    pub fn foreground(&self) -> Option<&ForegroundJob> {
        self.foreground.as_ref()
    }

    /// True when `pid` is the recorded foreground process
    pub fn is_foreground(&self, pid: Pid) -> bool {
        self.foreground.as_ref().is_some_and(|fg| fg.pid == pid)
    }

    /// Take the foreground record, leaving none behind
    pub fn take_foreground(&mut self) -> Option<ForegroundJob> {
        self.foreground.take()
    }
}
