use crate::constants::{DEFAULT_SYNC_CHUNK_SIZE, DEFAULT_SYNC_WINDOW};

/// Bounds for one sync call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Most recent records considered per call.
    pub window: usize,
    /// Entries embedded and committed per chunk.
    pub chunk_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_SYNC_WINDOW,
            chunk_size: DEFAULT_SYNC_CHUNK_SIZE,
        }
    }
}

impl SyncConfig {
    pub fn new(window: usize, chunk_size: usize) -> Self {
        Self { window, chunk_size }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be at least 1".to_string());
        }
        Ok(())
    }
}
