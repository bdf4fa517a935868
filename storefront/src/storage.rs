//! # Durable slot
//!
//! The cart survives between invocations through a single key-value slot,
//! last writer wins.
//!
//! ## Requirements
//!
//! - One serialized document, a few dozen line items at most
//! - Synchronous read/write, one writer per session
//! - An absent or unreadable slot must never block the storefront
//!
//! ## Implementation
//!
//! - `CartSlot` is the narrow surface the cart store writes through
//! - `FileSlot` keeps the document in one JSON file at a configured path
//! - `MemorySlot` keeps it in-process, for embedding and tests
//! - No partial-write or transactional handling: the full document is
//!   rewritten after every mutation

use std::{
    cell::RefCell,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

pub trait CartSlot {
    fn read(&self) -> io::Result<Option<String>>;
    fn write(&mut self, payload: &str) -> io::Result<()>;
}

/// Slot backed by a single JSON file. A missing file reads as `None`.
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartSlot for FileSlot {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, payload: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, payload)
    }
}

/// In-process slot. Clones share the same value, so a test can hand one
/// clone to the store and inspect the other.
#[derive(Clone, Default)]
pub struct MemorySlot {
    value: Rc<RefCell<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartSlot for MemorySlot {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.value.borrow().clone())
    }

    fn write(&mut self, payload: &str) -> io::Result<()> {
        *self.value.borrow_mut() = Some(payload.to_owned());
        Ok(())
    }
}
