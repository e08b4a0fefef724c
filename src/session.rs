//! Namespace Session
//!
//! An opened handle on one namespace directory.
//!
//! ## Lifecycle
//! ```text
//!   new() ──► begin(name, read_only) ──► put/get/remove/clear ... ──► end()
//!                  │                                                  │
//!                  └── runs StorageRoot::ensure_ready() first         └── also on drop
//! ```
//!
//! A session is bound to one namespace at a time: `begin` on a started
//! session fails, and every operation on an ended session fails with
//! `NotStarted`.

use std::sync::Arc;

use crate::error::{PrefsError, Result};
use crate::path;
use crate::protocol;
use crate::root::StorageRoot;

/// State of a started session
#[derive(Debug)]
struct OpenNamespace {
    /// Namespace name as passed to `begin`
    name: String,
    /// Resolved directory path, with trailing separator
    path: String,
    /// Mutations rejected when set
    read_only: bool,
}

/// Handle on one namespace of a [`StorageRoot`]
pub struct Preferences {
    /// Shared storage context
    root: Arc<StorageRoot>,

    /// `Some` between `begin` and `end`
    state: Option<OpenNamespace>,
}

impl Preferences {
    /// Create a session that is not started yet
    pub fn new(root: Arc<StorageRoot>) -> Self {
        Self { root, state: None }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open `name`, creating its directory if needed
    pub fn begin(&mut self, name: &str, read_only: bool) -> Result<()> {
        if self.state.is_some() {
            return Err(PrefsError::AlreadyStarted);
        }
        if !path::validate_namespace(name) {
            return Err(PrefsError::InvalidName(name.to_string()));
        }

        self.root.ensure_ready()?;

        let namespace_path = path::namespace_path(self.root.root(), name);
        self.root.backend().mkdir(path::directory(&namespace_path))?;

        tracing::debug!("namespace {} opened (read_only={})", name, read_only);
        self.state = Some(OpenNamespace {
            name: name.to_string(),
            path: namespace_path,
            read_only,
        });
        Ok(())
    }

    /// Close the session; a no-op if it is not started
    pub fn end(&mut self) {
        if let Some(ns) = self.state.take() {
            tracing::debug!("namespace {} closed", ns.name);
        }
    }

    /// True between `begin` and `end`
    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    /// True if the session is started read-only
    pub fn is_read_only(&self) -> bool {
        self.state.as_ref().map(|ns| ns.read_only).unwrap_or(false)
    }

    /// Name of the open namespace
    pub fn namespace(&self) -> Option<&str> {
        self.state.as_ref().map(|ns| ns.name.as_str())
    }

    /// Get the shared storage context
    pub fn storage(&self) -> &Arc<StorageRoot> {
        &self.root
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Store `value` under `key`, returns the number of bytes written
    ///
    /// Zero-length values are stored and read back as empty.
    pub fn put_bytes(&self, key: &str, value: &[u8]) -> Result<usize> {
        let ns = self.writable()?;
        Self::check_key(key)?;

        let max = self.root.config().max_value_size;
        if value.len() > max {
            return Err(PrefsError::ValueTooLarge {
                len: value.len(),
                max,
            });
        }

        protocol::put(&self.root, &ns.path, key, value)
    }

    /// Delete `key`; a missing key is `NotFound`
    pub fn remove(&self, key: &str) -> Result<()> {
        let ns = self.writable()?;
        Self::check_key(key)?;
        self.root.backend().unlink(&path::key_path(&ns.path, key))
    }

    /// Delete every key in the namespace
    ///
    /// The session stays usable afterwards.
    pub fn clear(&self) -> Result<()> {
        let ns = self.writable()?;
        protocol::clear(&self.root, &ns.path)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// True if `key` holds a value (possibly empty)
    pub fn is_key(&self, key: &str) -> bool {
        match self.opened() {
            Ok(ns) if path::validate_key(key) => {
                self.root.backend().exists(&path::key_path(&ns.path, key))
            }
            _ => false,
        }
    }

    /// Stored length of `key`
    pub fn get_bytes_length(&self, key: &str) -> Result<usize> {
        let ns = self.opened()?;
        Self::check_key(key)?;
        protocol::length(&self.root, &ns.path, key)
    }

    /// Read `key` into the front of `buf`, returns the value length
    ///
    /// Fails with `Capacity` (and leaves `buf` untouched) when the value is
    /// longer than `buf`.
    pub fn get_bytes(&self, key: &str, buf: &mut [u8]) -> Result<usize> {
        let ns = self.opened()?;
        Self::check_key(key)?;
        protocol::read_into(&self.root, &ns.path, key, buf)
    }

    /// Read `key` into a new vector
    pub fn get_bytes_vec(&self, key: &str) -> Result<Vec<u8>> {
        let ns = self.opened()?;
        Self::check_key(key)?;
        protocol::read_to_vec(&self.root, &ns.path, key)
    }

    /// Keys currently stored in the namespace, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let ns = self.opened()?;
        let mut keys: Vec<String> = self
            .root
            .backend()
            .list_dir(path::directory(&ns.path))?
            .into_iter()
            .filter(|name| !path::is_reserved(name))
            .collect();
        keys.sort();
        Ok(keys)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn opened(&self) -> Result<&OpenNamespace> {
        self.state.as_ref().ok_or(PrefsError::NotStarted)
    }

    fn writable(&self) -> Result<&OpenNamespace> {
        let ns = self.opened()?;
        if ns.read_only {
            return Err(PrefsError::ReadOnly);
        }
        Ok(ns)
    }

    fn check_key(key: &str) -> Result<()> {
        if path::validate_key(key) {
            Ok(())
        } else {
            Err(PrefsError::InvalidKey(key.to_string()))
        }
    }
}

impl Drop for Preferences {
    fn drop(&mut self) {
        self.end();
    }
}
