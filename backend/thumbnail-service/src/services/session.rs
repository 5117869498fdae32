//! Session registry - hands out per-request session IDs
//!
//! Session IDs namespace the temporary working files so that concurrent
//! requests for the same remote file never collide on disk.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Process-wide session state, constructed once at startup and shared by reference
#[derive(Debug)]
pub struct SessionRegistry {
    next_session_id: Mutex<u64>,
    temp_directory: PathBuf,
}

impl SessionRegistry {
    pub fn new(temp_directory: impl Into<PathBuf>) -> Self {
        Self {
            next_session_id: Mutex::new(0),
            temp_directory: temp_directory.into(),
        }
    }

    /// Return the current counter value and advance it.
    ///
    /// The lock is held only for the read-and-increment, never across I/O.
    pub fn allocate_session_id(&self) -> u64 {
        let mut next = self
            .next_session_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let session_id = *next;
        *next = next.wrapping_add(1);
        session_id
    }

    pub fn temp_directory(&self) -> &Path {
        &self.temp_directory
    }
}
