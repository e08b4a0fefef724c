//! Backend Module
//!
//! The file-like capability interface the store is built on.
//!
//! ## Responsibilities
//! - Expose the primitive operations the protocols need (create, read,
//!   rename, unlink, directory erase, ...)
//! - Advertise which strategies the medium supports via [`Capabilities`]
//! - Hide the concrete medium (host filesystem, memory, null stub)
//!
//! ## Path Convention
//! Backend paths are `/`-separated strings such as `/nvs/settings/volume`.
//! A trailing separator is allowed on directory paths and ignored.
//!
//! ## Atomicity Assumptions
//! ```text
//! create / update : all-or-nothing from the caller's point of view
//! rename          : source disappears and destination appears as one event
//! ```

mod fs;
mod memory;
mod null;

use std::sync::Arc;

pub use fs::FsBackend;
pub use memory::{Fault, MemoryBackend};
pub use null::NullBackend;

use crate::config::{BackendKind, Config};
use crate::error::{PrefsError, Result};

/// Strategy flags advertised by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Files can be rewritten from offset 0 without staging
    pub in_place_update: bool,

    /// Whole directories can be renamed atomically (enables quarantine clear)
    pub atomic_dir_rename: bool,
}

impl Capabilities {
    /// Flash filesystem style: staged puts, quarantine clears
    pub const fn atomic() -> Self {
        Self {
            in_place_update: false,
            atomic_dir_rename: true,
        }
    }

    /// Staged puts, in-place directory erase
    pub const fn staged() -> Self {
        Self {
            in_place_update: false,
            atomic_dir_rename: false,
        }
    }

    /// In-place updates, in-place directory erase
    pub const fn in_place() -> Self {
        Self {
            in_place_update: true,
            atomic_dir_rename: false,
        }
    }
}

/// Primitive operations over a hierarchical file store
///
/// All calls are synchronous. Implementations must be safe to share
/// between threads, but the store never issues overlapping mutations
/// against one namespace.
pub trait Backend: Send + Sync {
    /// Strategy flags for this medium
    fn capabilities(&self) -> Capabilities;

    /// Bring the medium up (mount, format check, ...)
    fn init(&self) -> Result<()>;

    /// Create a directory. An existing directory is success, an existing
    /// non-directory is an error.
    fn mkdir(&self, path: &str) -> Result<()>;

    /// True if anything (file or directory) exists at `path`
    fn exists(&self, path: &str) -> bool;

    /// Length of the file at `path`, `None` if there is no such file
    fn size(&self, path: &str) -> Option<usize>;

    /// Create or truncate the file at `path` and write `data` into it
    fn create(&self, path: &str, data: &[u8]) -> Result<usize>;

    /// Read from the start of the file into `buf`, returns bytes read
    fn read(&self, path: &str, buf: &mut [u8]) -> Result<usize>;

    /// True if the file at `path` holds exactly `data`
    ///
    /// Values longer than `limit` are never compared.
    fn verify(&self, path: &str, data: &[u8], limit: usize) -> bool {
        if data.len() > limit || self.size(path) != Some(data.len()) {
            return false;
        }
        let mut stored = vec![0u8; data.len()];
        match self.read(path, &mut stored) {
            Ok(n) => n == data.len() && stored == data,
            Err(_) => false,
        }
    }

    /// Rewrite an existing file from offset 0 without truncating it
    ///
    /// Only called when [`Capabilities::in_place_update`] is set and the new
    /// content is at least as long as the stored one.
    fn update(&self, _path: &str, _data: &[u8]) -> Result<usize> {
        Err(PrefsError::Backend(
            "in-place update not supported by this backend".to_string(),
        ))
    }

    /// Atomically move `from` to `to`
    fn rename(&self, from: &str, to: &str) -> Result<()>;

    /// Remove the file at `path`
    fn unlink(&self, path: &str) -> Result<()>;

    /// Remove everything below the directory at `path`, keeping the directory
    fn clean_dir(&self, path: &str) -> Result<()>;

    /// Names of the direct children of the directory at `path`
    fn list_dir(&self, path: &str) -> Result<Vec<String>>;
}

/// Build the backend named by the configuration
pub fn from_config(config: &Config) -> Arc<dyn Backend> {
    match &config.backend {
        BackendKind::Filesystem {
            base_dir,
            atomic_clear,
        } => {
            let capabilities = Capabilities {
                in_place_update: false,
                atomic_dir_rename: *atomic_clear,
            };
            Arc::new(FsBackend::new(base_dir).with_capabilities(capabilities))
        }
        BackendKind::Memory { capabilities } => {
            Arc::new(MemoryBackend::with_capabilities(*capabilities))
        }
        BackendKind::Null => Arc::new(NullBackend),
    }
}
