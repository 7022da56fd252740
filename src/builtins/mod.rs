//! Builtin commands
//!
//! Every builtin receives the argument vector of its line with the
//! background marker removed; failures come back as [`Error`] values and
//! are reported by the shell loop.
//!
//! [`Error`]: crate::error::Error

pub mod jobs;
pub mod shell;
pub mod utils;

use crate::context::ShellContext;
use crate::error::Result;
use crate::execution::timeout;
use crate::models::{BuiltinCommand, BuiltinKind};

/// Run a builtin in-process
pub fn execute(cmd: &BuiltinCommand, ctx: &mut ShellContext) -> Result<()> {
    trace!("builtin {}: {:?}", cmd.kind.name(), cmd.args);

    match cmd.kind {
        BuiltinKind::Chprompt => shell::chprompt(&cmd.args, ctx),
        BuiltinKind::Showpid => shell::showpid(ctx),
        BuiltinKind::Pwd => shell::pwd(),
        BuiltinKind::Cd => shell::cd(&cmd.args, ctx),
        BuiltinKind::Jobs => jobs::jobs(ctx),
        BuiltinKind::Fg => jobs::fg(&cmd.args, ctx),
        BuiltinKind::Bg => jobs::bg(&cmd.args, ctx),
        BuiltinKind::Quit => jobs::quit(&cmd.args, ctx),
        BuiltinKind::Kill => jobs::kill(&cmd.args, ctx),
        BuiltinKind::Setcore => utils::setcore(&cmd.args, ctx),
        BuiltinKind::Getfiletype => utils::getfiletype(&cmd.args),
        BuiltinKind::Chmod => utils::chmod(&cmd.args),
        BuiltinKind::Timeout => timeout::run(cmd, ctx),
        BuiltinKind::Listdir => utils::listdir(&cmd.args),
        BuiltinKind::Getuser => utils::getuser(&cmd.args),
    }
}

/// Parse a job id the way the shell accepts them: any integer, so that
/// negative ids are reported as missing jobs rather than malformed input
pub(crate) fn parse_job_id(token: &str) -> Option<i64> {
    token.parse().ok()
}

/// True for a non-empty run of ASCII digits
pub(crate) fn is_number(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}
