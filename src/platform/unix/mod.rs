//! Unix-specific platform implementations

mod process;

pub use process::UnixProcess;
