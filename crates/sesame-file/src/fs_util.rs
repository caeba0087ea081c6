//! Shared filesystem helpers.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use fs2::FileExt;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// An exclusive advisory lock held until dropped.
pub(crate) struct LockGuard {
    file: File,
}

impl LockGuard {
    pub fn acquire(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;

        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Write `content` to `path` atomically (temp file + rename).
///
/// With `private` set the temp file is created owner-only on Unix, so the
/// content is never readable by others at any point.
pub(crate) fn write_atomic(path: &Path, content: &[u8], private: bool) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    // Cleared so `create_new` below always applies the fresh mode.
    if temp_path.exists() {
        fs::remove_file(&temp_path)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    if private {
        options.mode(0o600);
    }

    #[cfg(not(unix))]
    let _ = private;

    let mut file = options.open(&temp_path)?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)
}
