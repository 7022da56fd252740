//! File and process utilities: listdir, getfiletype, chmod, setcore, getuser

use nix::sched::{sched_setaffinity, CpuSet};
use nix::unistd::{Gid, Group, Uid, User};
use std::fs::{self, Permissions};
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::path::Path;

use super::is_number;
use crate::context::ShellContext;
use crate::error::{Error, Result};

/// `listdir [path]`: files, then directories, then links, each sorted
pub fn listdir(args: &[String]) -> Result<()> {
    if args.len() > 2 {
        return Err(Error::usage("listdir", "too many arguments"));
    }
    let path = args.get(1).map(String::as_str).unwrap_or(".");

    for line in list_directory(Path::new(path))? {
        println!("{}", line);
    }
    Ok(())
}

/// Entry lines for `listdir`, grouped and sorted
pub fn list_directory(path: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let mut directories = vec![".".to_string(), "..".to_string()];
    let mut links = Vec::new();

    for entry in fs::read_dir(path).map_err(|e| Error::from_io("opendir", e))? {
        let entry = entry.map_err(|e| Error::from_io("readdir", e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type().map_err(|e| Error::from_io("readdir", e))?;

        if file_type.is_symlink() {
            links.push(name);
        } else if file_type.is_dir() {
            directories.push(name);
        } else if file_type.is_file() {
            files.push(name);
        }
    }

    files.sort();
    directories.sort();
    links.sort();

    let lines = files
        .into_iter()
        .map(|name| format!("file: {}", name))
        .chain(directories.into_iter().map(|name| format!("directory: {}", name)))
        .chain(links.into_iter().map(|name| format!("link: {}", name)))
        .collect();
    Ok(lines)
}

/// `getfiletype <path>`
pub fn getfiletype(args: &[String]) -> Result<()> {
    if args.len() != 2 {
        return Err(Error::usage("gettype", "invalid arguments"));
    }
    println!("{}", describe_file(Path::new(&args[1]))?);
    Ok(())
}

/// `<path>'s type is "<kind>" and takes up <size> bytes`, without
/// following a final symbolic link
pub fn describe_file(path: &Path) -> Result<String> {
    let metadata = fs::symlink_metadata(path).map_err(|e| Error::from_io("lstat", e))?;
    let file_type = metadata.file_type();

    let kind = if file_type.is_file() {
        "regular file"
    } else if file_type.is_dir() {
        "directory"
    } else if file_type.is_symlink() {
        "symbolic link"
    } else if file_type.is_char_device() {
        "character device"
    } else if file_type.is_block_device() {
        "block device"
    } else if file_type.is_fifo() {
        "FIFO"
    } else if file_type.is_socket() {
        "socket"
    } else {
        "unknown"
    };

    Ok(format!(
        "{}'s type is \"{}\" and takes up {} bytes",
        path.display(),
        kind,
        metadata.len()
    ))
}

/// `chmod <octal-mode> <path>`
pub fn chmod(args: &[String]) -> Result<()> {
    let invalid = || Error::usage("chmod", "invalid arguments");
    if args.len() != 3 || !is_number(&args[1]) {
        return Err(invalid());
    }
    let mode = u32::from_str_radix(&args[1], 8).map_err(|_| invalid())?;

    fs::set_permissions(&args[2], Permissions::from_mode(mode))
        .map_err(|e| Error::from_io("chmod", e))?;
    debug!("chmod {:o} {}", mode, args[2]);
    Ok(())
}

/// `setcore <job-id> <core>`: pin a job to one CPU core
pub fn setcore(args: &[String], ctx: &mut ShellContext) -> Result<()> {
    let invalid = || Error::usage("setcore", "invalid arguments");
    if args.len() != 3 || !is_number(&args[1]) || !is_number(&args[2]) {
        return Err(invalid());
    }
    let job_id: u32 = args[1].parse().map_err(|_| invalid())?;
    let core: usize = args[2].parse().map_err(|_| invalid())?;

    let pid = ctx
        .jobs
        .get_job_by_id(job_id)
        .map(|job| job.pid)
        .ok_or_else(|| Error::usage("setcore", format!("job-id {} does not exist", job_id)))?;

    let invalid_core = || Error::usage("setcore", "invalid core number");
    if core >= online_cpus() {
        return Err(invalid_core());
    }
    let mut cpu_set = CpuSet::new();
    cpu_set.set(core).map_err(|_| invalid_core())?;

    sched_setaffinity(pid, &cpu_set).map_err(|e| Error::syscall("sched_setaffinity", e))?;
    debug!("job [{}] pid {} pinned to core {}", job_id, pid, core);
    Ok(())
}

fn online_cpus() -> usize {
    // SAFETY: sysconf has no preconditions
    let count = unsafe { nix::libc::sysconf(nix::libc::_SC_NPROCESSORS_ONLN) };
    usize::try_from(count).unwrap_or(1)
}

/// `getuser <pid>`: owner and group of a process
pub fn getuser(args: &[String]) -> Result<()> {
    if args.len() != 2 {
        return Err(Error::usage("getuser", "invalid arguments"));
    }
    let pid = &args[1];
    let missing = || Error::usage("getuser", format!("process {} does not exist", pid));

    let (user, group) = process_owner(pid).ok_or_else(missing)?;
    println!("User: {}", user);
    println!("Group: {}", group);
    Ok(())
}

/// Real user and group names of a process, from `/proc/<pid>/status`
pub fn process_owner(pid: &str) -> Option<(String, String)> {
    if !is_number(pid) {
        return None;
    }
    let status = fs::read_to_string(format!("/proc/{}/status", pid)).ok()?;
    let uid = status_field(&status, "Uid:")?;
    let gid = status_field(&status, "Gid:")?;

    let user = User::from_uid(Uid::from_raw(uid)).ok()??;
    let group = Group::from_gid(Gid::from_raw(gid)).ok()??;
    Some((user.name, group.name))
}

/// First numeric column of a `/proc/<pid>/status` line
fn status_field(status: &str, key: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix(key))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
}
