//! Command Model
//!
//! One parsed command line. A line is either a builtin, an external
//! program, a two-stage pipeline, or a command whose standard output is
//! redirected to a file. Pipelines and redirections own their
//! sub-commands.

use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::parser::{self, CommandKind};

/// How a redirection target is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// `>`: truncate the file
    Truncate,
    /// `>>`: append to the file
    Append,
}

/// Which stream of the left-hand command feeds the pipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeSource {
    /// `|`: standard output
    Stdout,
    /// `|&`: standard error
    Stderr,
}

/// Commands implemented inside the shell, keyed by their first token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Chprompt,
    Showpid,
    Pwd,
    Cd,
    Jobs,
    Fg,
    Bg,
    Quit,
    Kill,
    Setcore,
    Getfiletype,
    Chmod,
    Timeout,
    Listdir,
    Getuser,
}

impl BuiltinKind {
    /// Every builtin, in dispatch-table order
    pub const ALL: [BuiltinKind; 15] = [
        BuiltinKind::Chprompt,
        BuiltinKind::Showpid,
        BuiltinKind::Pwd,
        BuiltinKind::Cd,
        BuiltinKind::Jobs,
        BuiltinKind::Fg,
        BuiltinKind::Bg,
        BuiltinKind::Quit,
        BuiltinKind::Kill,
        BuiltinKind::Setcore,
        BuiltinKind::Getfiletype,
        BuiltinKind::Chmod,
        BuiltinKind::Timeout,
        BuiltinKind::Listdir,
        BuiltinKind::Getuser,
    ];

    /// Exact-match lookup of a first token
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The token that selects this builtin
    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::Chprompt => "chprompt",
            BuiltinKind::Showpid => "showpid",
            BuiltinKind::Pwd => "pwd",
            BuiltinKind::Cd => "cd",
            BuiltinKind::Jobs => "jobs",
            BuiltinKind::Fg => "fg",
            BuiltinKind::Bg => "bg",
            BuiltinKind::Quit => "quit",
            BuiltinKind::Kill => "kill",
            BuiltinKind::Setcore => "setcore",
            BuiltinKind::Getfiletype => "getfiletype",
            BuiltinKind::Chmod => "chmod",
            BuiltinKind::Timeout => "timeout",
            BuiltinKind::Listdir => "listdir",
            BuiltinKind::Getuser => "getuser",
        }
    }
}

/// A builtin invocation
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinCommand {
    pub kind: BuiltinKind,
    /// Raw line as typed
    pub line: String,
    /// Tokens of the line without its background marker
    pub args: Vec<String>,
}

/// An external program invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalCommand {
    /// Raw line as typed, handed untouched to the interpreter when complex
    pub line: String,
    /// Tokens of the line without its background marker
    pub args: Vec<String>,
    /// Set when any token carries a glob metacharacter
    pub complex: bool,
}

/// Two commands joined by `|` or `|&`
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineCommand {
    pub line: String,
    pub args: Vec<String>,
    pub source: PipeSource,
    pub left: Box<Command>,
    pub right: Box<Command>,
}

/// A command whose standard output goes to a file
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectionCommand {
    pub line: String,
    pub args: Vec<String>,
    pub mode: RedirectMode,
    pub target: PathBuf,
    pub inner: Box<Command>,
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Builtin(BuiltinCommand),
    External(ExternalCommand),
    Pipeline(PipelineCommand),
    Redirection(RedirectionCommand),
}

impl Command {
    /// Parse a line without alias expansion
    ///
    /// Returns `Ok(None)` for an empty or all-whitespace line.
    pub fn parse(line: &str, max_args: usize) -> Result<Option<Command>> {
        Self::build(line, max_args, &|line| line.to_string())
    }

    /// Parse a line, passing it and every pipeline/redirection half
    /// through `expand` first
    pub fn build(
        line: &str,
        max_args: usize,
        expand: &dyn Fn(&str) -> String,
    ) -> Result<Option<Command>> {
        if parser::trim(line).is_empty() {
            return Ok(None);
        }

        let line = expand(line);
        let args = parser::tokenize(&parser::strip_background_marker(&line));
        if args.is_empty() {
            // A lone `&` carries no command
            return Ok(None);
        }
        if args.len() > max_args {
            return Err(Error::TooManyArguments {
                count: args.len(),
                max: max_args,
            });
        }

        let command = match parser::find_operator(&line) {
            Some(operator) => {
                let (left, right) = parser::split_at_operator(&line, &operator);
                match operator.kind {
                    CommandKind::Pipeline(source) => {
                        let left = Self::build(&left, max_args, expand)?.ok_or_else(|| {
                            Error::Parse("missing command before pipe".to_string())
                        })?;
                        let right = Self::build(&right, max_args, expand)?.ok_or_else(|| {
                            Error::Parse("missing command after pipe".to_string())
                        })?;
                        Command::Pipeline(PipelineCommand {
                            line,
                            args,
                            source,
                            left: Box::new(left),
                            right: Box::new(right),
                        })
                    }
                    CommandKind::Redirection(mode) => {
                        let inner = Self::build(&left, max_args, expand)?.ok_or_else(|| {
                            Error::Parse("missing command before redirection".to_string())
                        })?;
                        Command::Redirection(RedirectionCommand {
                            line,
                            args,
                            mode,
                            target: PathBuf::from(right),
                            inner: Box::new(inner),
                        })
                    }
                    CommandKind::Builtin(_) | CommandKind::External => {
                        unreachable!("find_operator only yields pipelines and redirections")
                    }
                }
            }
            None => match parser::classify(&line) {
                CommandKind::Builtin(kind) => Command::Builtin(BuiltinCommand { kind, line, args }),
                _ => {
                    let complex = parser::is_complex(&args);
                    Command::External(ExternalCommand {
                        line,
                        args,
                        complex,
                    })
                }
            },
        };

        Ok(Some(command))
    }

    /// The raw text this command was built from
    pub fn line(&self) -> &str {
        match self {
            Command::Builtin(cmd) => &cmd.line,
            Command::External(cmd) => &cmd.line,
            Command::Pipeline(cmd) => &cmd.line,
            Command::Redirection(cmd) => &cmd.line,
        }
    }

    /// Tokens of the line without its background marker
    pub fn args(&self) -> &[String] {
        match self {
            Command::Builtin(cmd) => &cmd.args,
            Command::External(cmd) => &cmd.args,
            Command::Pipeline(cmd) => &cmd.args,
            Command::Redirection(cmd) => &cmd.args,
        }
    }

    /// True when the raw line ends in a background marker
    pub fn is_background(&self) -> bool {
        parser::has_background_marker(self.line())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.line())
    }
}
