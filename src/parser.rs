//! Command line parsing
//!
//! Turns a raw input line into the pieces the executor needs: the
//! argument vector, the trailing background marker, and the single
//! pipe or redirection operator a line may carry.
//!
//! Scanning is literal. There is no quoting, so a `>` or `|` inside
//! what looks like an argument still selects a redirection or pipeline.

use crate::models::{BuiltinKind, PipeSource, RedirectMode};

/// Characters treated as token separators
pub const WHITESPACE: &[char] = &[' ', '\n', '\r', '\t', '\x0c', '\x0b'];

/// Trailing character that sends a command to the background
pub const BACKGROUND_MARKER: char = '&';

/// Characters that make an external command "complex" (handed to the interpreter)
pub const GLOB_METACHARACTERS: &[char] = &['*', '?'];

fn is_whitespace(c: char) -> bool {
    WHITESPACE.contains(&c)
}

/// Trim shell whitespace from both ends
pub fn trim(line: &str) -> &str {
    line.trim_matches(is_whitespace)
}

/// Split a line into whitespace-separated tokens
///
/// An empty or all-whitespace line yields an empty vector, which callers
/// treat as "nothing to execute".
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(is_whitespace)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// True iff the last non-whitespace character is the background marker
pub fn has_background_marker(line: &str) -> bool {
    line.trim_end_matches(is_whitespace)
        .ends_with(BACKGROUND_MARKER)
}

/// Remove a trailing background marker and the whitespace before it
///
/// Lines without a marker are returned unchanged. Repeated markers
/// (`cmd & &`, `cmd&&`) are all removed so that applying this twice
/// gives the same result as applying it once.
pub fn strip_background_marker(line: &str) -> String {
    if !has_background_marker(line) {
        return line.to_string();
    }

    let mut stripped = line.trim_end_matches(is_whitespace);
    while let Some(rest) = stripped.strip_suffix(BACKGROUND_MARKER) {
        stripped = rest.trim_end_matches(is_whitespace);
    }
    stripped.to_string()
}

/// First token of the line with a glued-on background marker removed
///
/// `jobs&` dispatches the same way as `jobs &`.
pub fn first_word(line: &str) -> Option<&str> {
    let word = trim(line).split(is_whitespace).next()?;
    if word.is_empty() {
        return None;
    }
    Some(word.strip_suffix(BACKGROUND_MARKER).unwrap_or(word))
}

/// True if any token contains a glob metacharacter
pub fn is_complex(args: &[String]) -> bool {
    args.iter()
        .any(|arg| arg.contains(GLOB_METACHARACTERS))
}

/// What kind of command a line describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Standard output goes to a file
    Redirection(RedirectMode),
    /// Two commands joined by a pipe
    Pipeline(PipeSource),
    /// A command implemented by the shell
    Builtin(BuiltinKind),
    /// Any other program
    External,
}

/// An operator found by the left-to-right scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    /// Pipeline or redirection selected by the operator
    pub kind: CommandKind,
    /// Byte offset of the operator in the raw line
    pub index: usize,
    /// Operator length in bytes (`>` and `|` are 1, `>>` and `|&` are 2)
    pub len: usize,
}

/// Find the first pipe or redirection operator in the raw line
///
/// At each position `>>` is tried before `>` and `|&` before `|`; the
/// first position holding any of them wins.
pub fn find_operator(line: &str) -> Option<Operator> {
    let bytes = line.as_bytes();
    for (index, &byte) in bytes.iter().enumerate() {
        let next = bytes.get(index + 1).copied();
        let (kind, len) = match (byte, next) {
            (b'>', Some(b'>')) => (CommandKind::Redirection(RedirectMode::Append), 2),
            (b'>', _) => (CommandKind::Redirection(RedirectMode::Truncate), 1),
            (b'|', Some(b'&')) => (CommandKind::Pipeline(PipeSource::Stderr), 2),
            (b'|', _) => (CommandKind::Pipeline(PipeSource::Stdout), 1),
            _ => continue,
        };
        return Some(Operator { kind, index, len });
    }
    None
}

/// Decide which command variant a line builds
pub fn classify(line: &str) -> CommandKind {
    if let Some(operator) = find_operator(line) {
        return operator.kind;
    }

    match first_word(line).and_then(BuiltinKind::from_name) {
        Some(kind) => CommandKind::Builtin(kind),
        None => CommandKind::External,
    }
}

/// Split a line around an operator into cleaned-up left and right halves
///
/// Each half is trimmed and has its own background marker removed.
pub fn split_at_operator(line: &str, operator: &Operator) -> (String, String) {
    let left = &line[..operator.index];
    let right = &line[operator.index + operator.len..];
    (clean_half(left), clean_half(right))
}

fn clean_half(half: &str) -> String {
    trim(&strip_background_marker(trim(half))).to_string()
}
