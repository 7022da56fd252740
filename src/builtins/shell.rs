//! Shell-state builtins: chprompt, showpid, pwd, cd

use std::path::{Path, PathBuf};

use crate::context::ShellContext;
use crate::error::{Error, Result};

/// `chprompt [prompt]`: set the prompt, or reset it to the configured default
pub fn chprompt(args: &[String], ctx: &mut ShellContext) -> Result<()> {
    ctx.prompt = match args.get(1) {
        Some(prompt) => prompt.clone(),
        None => ctx.config.prompt.clone(),
    };
    Ok(())
}

pub fn showpid(ctx: &ShellContext) -> Result<()> {
    println!("smash pid is {}", ctx.shell_pid);
    Ok(())
}

pub fn pwd() -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| Error::from_io("getcwd", e))?;
    println!("{}", cwd.display());
    Ok(())
}

/// `cd [path|-|..]`
///
/// `-` returns to the previous directory; `..` goes to the parent, with
/// the root staying the root. The previous directory is updated only on
/// success.
pub fn cd(args: &[String], ctx: &mut ShellContext) -> Result<()> {
    if args.len() > 2 {
        return Err(Error::usage("cd", "too many arguments"));
    }
    let Some(target) = args.get(1) else {
        return Ok(());
    };

    let cwd = std::env::current_dir().map_err(|e| Error::from_io("getcwd", e))?;
    let destination = match target.as_str() {
        "-" => ctx
            .last_dir
            .clone()
            .ok_or_else(|| Error::usage("cd", "OLDPWD not set"))?,
        ".." => parent_of(&cwd),
        path => PathBuf::from(path),
    };

    std::env::set_current_dir(&destination).map_err(|e| Error::from_io("chdir", e))?;
    debug!("cd {} -> {}", cwd.display(), destination.display());
    ctx.last_dir = Some(cwd);
    Ok(())
}

fn parent_of(dir: &Path) -> PathBuf {
    dir.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"))
}
