//! `timeout <seconds> <command…>`
//!
//! Each timed command gets a deadline in the registry. A single
//! `SIGALRM` is kept armed for the nearest deadline; the signal bridge
//! kills whatever expired and re-arms for the next one.

use nix::unistd::{alarm, Pid};
use std::time::{Duration, Instant};

use crate::context::ShellContext;
use crate::error::{Error, Result};
use crate::execution::external;
use crate::models::{BuiltinCommand, ExternalCommand};
use crate::parser;

/// One registered deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutEntry {
    pub pid: Pid,
    /// Full `timeout …` line, used in the timed-out notice
    pub command_line: String,
    pub deadline: Instant,
}

/// Deadlines ordered by registration
#[derive(Debug, Default)]
pub struct TimeoutRegistry {
    entries: Vec<TimeoutEntry>,
}

impl TimeoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, pid: Pid, command_line: String, after: Duration, now: Instant) {
        debug!("timeout registered: pid={} after={:?}", pid, after);
        self.entries.push(TimeoutEntry {
            pid,
            command_line,
            deadline: now + after,
        });
    }

    /// Remove and return every entry whose deadline is at or before `now`
    pub fn take_expired(&mut self, now: Instant) -> Vec<TimeoutEntry> {
        let (expired, pending): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.deadline <= now);
        self.entries = pending;
        expired
    }

    /// Whole seconds until the nearest deadline, rounded up, at least 1
    pub fn next_alarm_secs(&self, now: Instant) -> Option<u32> {
        let nearest = self.entries.iter().map(|entry| entry.deadline).min()?;
        let remaining = nearest.saturating_duration_since(now);
        let mut secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            secs += 1;
        }
        Some(secs.clamp(1, u64::from(u32::MAX)) as u32)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Point `SIGALRM` at the nearest deadline, or cancel it when none remain
pub fn arm_alarm(registry: &TimeoutRegistry, now: Instant) {
    match registry.next_alarm_secs(now) {
        Some(secs) => {
            trace!("alarm armed for {}s", secs);
            alarm::set(secs);
        }
        None => {
            alarm::cancel();
        }
    }
}

/// Run the `timeout` builtin
pub fn run(cmd: &BuiltinCommand, ctx: &mut ShellContext) -> Result<()> {
    let invalid = || Error::usage("timeout", "invalid arguments");

    if cmd.args.len() < 3 {
        return Err(invalid());
    }
    let secs: u64 = cmd.args[1]
        .parse()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(invalid)?;

    let args = cmd.args[2..].to_vec();
    let mut line = args.join(" ");
    if parser::has_background_marker(&cmd.line) {
        line.push_str(" &");
    }
    let inner = ExternalCommand {
        complex: parser::is_complex(&args),
        line,
        args,
    };

    let pid = external::launch(&inner, ctx)?;
    let now = Instant::now();
    ctx.timeouts
        .register(pid, cmd.line.clone(), Duration::from_secs(secs), now);
    arm_alarm(&ctx.timeouts, now);

    external::settle(&inner, pid, ctx)
}
