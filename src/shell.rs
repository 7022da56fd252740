//! Shell front end
//!
//! Turns one input line into a [`Command`] and runs it. This is the only
//! place errors are reported to the user; nothing propagates past
//! [`Shell::execute_line`].

use std::sync::Arc;

use crate::alias::AliasTable;
use crate::config::ShellConfig;
use crate::context::ShellContext;
use crate::error::Result;
use crate::execution;
use crate::models::Command;
use crate::parser;
use crate::platform::ProcessOps;
use crate::signals;

/// Builds commands with alias expansion and the configured argument limit
pub struct CommandBuilder<'a> {
    aliases: &'a AliasTable,
    max_args: usize,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(aliases: &'a AliasTable, max_args: usize) -> Self {
        Self { aliases, max_args }
    }

    /// `Ok(None)` for a line with nothing to run
    pub fn build(&self, line: &str) -> Result<Option<Command>> {
        Command::build(line, self.max_args, &|line| self.aliases.expand(line))
    }
}

/// An interactive shell session
#[derive(Debug)]
pub struct Shell {
    ctx: ShellContext,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            ctx: ShellContext::new(config),
        }
    }

    /// A shell whose signal delivery and reaping go through `ops`
    pub fn with_ops(config: ShellConfig, ops: Arc<dyn ProcessOps>) -> Self {
        Self {
            ctx: ShellContext::with_ops(config, ops),
        }
    }

    /// Text printed before each read, e.g. `smash> `
    pub fn prompt(&self) -> String {
        format!("{}> ", self.ctx.prompt)
    }

    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut ShellContext {
        &mut self.ctx
    }

    /// Run one line, reporting any failure as `smash error: …`
    ///
    /// Requests left over from the prompt are handled (against an empty
    /// foreground) before the line runs.
    pub fn execute_line(&mut self, line: &str) {
        signals::dispatch(&mut self.ctx);
        if let Err(e) = self.try_execute_line(line) {
            debug!("line {:?} failed: {:?}", line, e);
            e.report();
        }
        signals::dispatch(&mut self.ctx);
    }

    /// Run one line, handing failures back to the caller
    pub fn try_execute_line(&mut self, line: &str) -> Result<()> {
        // Alias management sees the raw line, before any expansion
        match parser::first_word(line) {
            Some("alias") => {
                let stripped = parser::strip_background_marker(line);
                return self.ctx.aliases.alias_command(&stripped);
            }
            Some("unalias") => {
                let args = parser::tokenize(&parser::strip_background_marker(line));
                return self.ctx.aliases.unalias_command(&args);
            }
            _ => {}
        }

        let command = CommandBuilder::new(&self.ctx.aliases, self.ctx.config.max_args).build(line)?;
        match command {
            Some(command) => execution::run(&command, &mut self.ctx),
            None => Ok(()),
        }
    }
}
