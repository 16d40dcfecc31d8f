//! Atomic file creation.
//!
//! Uses the atomicwrites crate so a file is either fully written or not
//! created at all. Existing files are never replaced.

use atomicwrites::{AtomicFile, OverwriteBehavior};
use std::io::{self, Write};
use std::path::Path;

/// Atomically create `path` with `contents`.
///
/// Fails with [`io::ErrorKind::AlreadyExists`] if the file already exists,
/// including when another process created it first.
pub fn create_new_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    AtomicFile::new(path, OverwriteBehavior::DisallowOverwrite)
        .write(|f| f.write_all(contents))
        .map_err(|e| match e {
            atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
        })
}
