//! Side-channel record of the resolved mode.
//!
//! Web entry points learn their mode from the external signal. Console entry
//! points usually cannot see that signal, so the first successful resolution
//! that has a console bundle records the lowercase mode here, and console
//! callers read it back with [`crate::ModeOrigin::Marker`].

use crate::writer::create_new_atomic;
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Plain-text store holding a single lowercase mode name.
pub trait MarkerStore {
    /// The stored mode, or `None` when nothing has been recorded yet.
    fn read(&self) -> io::Result<Option<String>>;

    /// Record `mode` unless a marker already exists.
    ///
    /// Returns `true` if this call wrote the marker.
    fn write_if_absent(&self, mode: &str) -> io::Result<bool>;

    /// Where the marker lives, for logs and error messages.
    fn location(&self) -> String;
}

/// Marker kept in a file, by default `<config_dir>/mode`.
#[derive(Debug, Clone)]
pub struct FileMarker {
    path: PathBuf,
}

impl FileMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MarkerStore for FileMarker {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let mode = raw.trim();
                Ok((!mode.is_empty()).then(|| mode.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_if_absent(&self, mode: &str) -> io::Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        settle_write(&self.path, create_new_atomic(&self.path, mode.as_bytes()))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

// A failed create is fine when the marker exists anyway: another process
// won the race and wrote the same content.
fn settle_write(path: &Path, written: io::Result<()>) -> io::Result<bool> {
    match written {
        Ok(()) => Ok(true),
        Err(e) if path.exists() => {
            tracing::debug!(path = %path.display(), error = %e, "Mode marker appeared concurrently");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// In-memory marker. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryMarker {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryMarker {
    pub fn with_mode(mode: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(mode.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl MarkerStore for MemoryMarker {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.contents())
    }

    fn write_if_absent(&self, mode: &str) -> io::Result<bool> {
        let mut slot = self.slot.borrow_mut();
        if slot.is_some() {
            return Ok(false);
        }
        *slot = Some(mode.to_string());
        Ok(true)
    }

    fn location(&self) -> String {
        "in-memory mode marker".into()
    }
}
