//! Error types and Result aliases for smash

use nix::errno::Errno;
use std::fmt;
use std::path::PathBuf;

/// Result type alias for smash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for smash
#[derive(Debug)]
pub enum Error {
    // === Parse and usage errors ===
    /// A builtin received malformed or out-of-range arguments
    Usage {
        builtin: &'static str,
        message: String,
    },

    /// The argument vector exceeds the configured maximum
    TooManyArguments {
        count: usize,
        max: usize,
    },

    /// The command line has a structural problem (e.g. an empty pipeline half)
    Parse(String),

    // === OS resource failures ===
    /// A system call failed; displayed the way `perror` would
    Syscall {
        call: &'static str,
        source: Errno,
    },

    /// Failed to send a signal to a process
    SignalSendFailed {
        pid: i32,
        signal: String,
        source: Errno,
    },

    // === Configuration errors ===
    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to parse configuration
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    /// Configuration validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    // === I/O and serialization errors ===
    /// I/O errors
    Io(std::io::Error),

    /// Regex compilation errors
    Regex(regex::Error),
}

impl Error {
    /// Shorthand for a builtin usage error
    pub fn usage(builtin: &'static str, message: impl Into<String>) -> Self {
        Error::Usage {
            builtin,
            message: message.into(),
        }
    }

    /// Shorthand for a failed system call
    pub fn syscall(call: &'static str, source: Errno) -> Self {
        Error::Syscall { call, source }
    }

    /// A failed std I/O call, reported with the name of the underlying syscall
    pub fn from_io(call: &'static str, err: std::io::Error) -> Self {
        match err.raw_os_error() {
            Some(code) => Error::Syscall {
                call,
                source: Errno::from_raw(code),
            },
            None => Error::Io(err),
        }
    }

    /// Print the error to stderr the way the shell reports every failure
    pub fn report(&self) {
        eprintln!("smash error: {}", self);
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Parse and usage errors
            Error::Usage { builtin, message } => write!(f, "{}: {}", builtin, message),
            Error::TooManyArguments { count, max } => {
                write!(f, "too many arguments ({} given, at most {})", count, max)
            }
            Error::Parse(msg) => write!(f, "{}", msg),

            // OS errors
            Error::Syscall { call, source } => write!(f, "{} failed: {}", call, source.desc()),
            Error::SignalSendFailed { source, .. } => write!(f, "kill failed: {}", source.desc()),

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(f, "Configuration validation failed for '{}': {}", field, reason)
            }

            // I/O and serialization errors
            Error::Io(err) => write!(f, "{}", err),
            Error::Regex(err) => write!(f, "Regex compilation error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Syscall { source, .. } | Error::SignalSendFailed { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            Error::Regex(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Regex(err)
    }
}
