//! # Data Directory Lock
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).
//!
//! A ledger data directory has a single writer process. The lock is acquired
//! when the file-backed ledger is opened and released on drop (RAII).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::errors::StoreError;

/// How long `acquire` keeps retrying before giving up.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// Exclusive lock on a ledger data directory.
///
/// # Example
///
/// ```ignore
/// let lock = DirectoryLock::acquire(Path::new("/var/lib/civic-ledger"))?;
/// // Lock is held until `lock` goes out of scope
/// ```
#[derive(Debug)]
pub struct DirectoryLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DirectoryLock {
    const LOCK_FILE: &'static str = "LOCK";

    /// Acquire the lock with the default timeout.
    pub fn acquire(data_dir: &Path) -> Result<Self, StoreError> {
        Self::acquire_with_timeout(data_dir, DEFAULT_LOCK_TIMEOUT)
    }

    /// Acquire the lock, retrying with exponential backoff until `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Locked` if another process still holds the lock
    /// when the timeout expires.
    pub fn acquire_with_timeout(data_dir: &Path, timeout: Duration) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;

        let deadline = Instant::now() + timeout;
        let lock_path = data_dir.join(Self::LOCK_FILE);
        let mut retry_delay = Duration::from_millis(20);

        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)?;

            match file.try_lock_exclusive() {
                Ok(()) => {
                    let pid = std::process::id();
                    let mut locked = file;
                    locked.set_len(0)?;
                    writeln!(locked, "{}", pid)?;
                    locked.sync_all()?;

                    tracing::debug!("[lock] 🔒 Acquired {} (pid {})", lock_path.display(), pid);
                    return Ok(Self {
                        file: locked,
                        path: lock_path,
                        pid,
                    });
                }
                Err(_) => {
                    drop(file);
                    if Instant::now() >= deadline {
                        return Err(StoreError::Locked {
                            pid: Self::read_existing_pid(&lock_path),
                            path: lock_path,
                        });
                    }
                    std::thread::sleep(retry_delay);
                    retry_delay = (retry_delay * 2).min(Duration::from_millis(200));
                }
            }
        }
    }

    /// PID of the process holding the lock.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for DirectoryLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
