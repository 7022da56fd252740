//! Platform abstraction layer
//!
//! Job control is Unix-only; this module keeps the OS calls behind a
//! trait object so the job table can be exercised without real processes.

mod traits;
#[cfg(unix)]
mod unix;

pub use traits::*;

use std::sync::Arc;

/// Platform implementation factory
pub struct Platform;

impl Platform {
    /// Get the platform-specific process operations
    pub fn process() -> Arc<dyn ProcessOps> {
        #[cfg(unix)]
        {
            Arc::new(unix::UnixProcess::new())
        }

        #[cfg(not(unix))]
        {
            compile_error!("Unsupported platform");
        }
    }
}
