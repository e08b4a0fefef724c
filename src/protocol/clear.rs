//! Atomic clear
//!
//! Empties a namespace. With an atomic directory rename the namespace is
//! first parked in the quarantine directory; once that rename lands the
//! clear is durable, and a crash before reaping is finished at next startup.

use crate::backend::Backend;
use crate::error::Result;
use crate::path;
use crate::root::StorageRoot;

/// Remove every key of the namespace at `namespace_path`
///
/// On success the namespace directory exists and is empty.
pub(crate) fn clear(root: &StorageRoot, namespace_path: &str) -> Result<()> {
    let backend = root.backend();

    if backend.capabilities().atomic_dir_rename {
        let dir = path::directory(namespace_path);
        let quarantine = path::quarantine_path(root.root());

        match backend.rename(dir, &quarantine) {
            Ok(()) => return reap(backend, dir, &quarantine),
            Err(e) => {
                tracing::warn!("cannot rename directory {:?}, erasing in place: {}", dir, e);
            }
        }
    }

    erase_in_place(backend, namespace_path)
}

/// Erase the quarantined entries and give the namespace a fresh directory
fn reap(backend: &dyn Backend, dir: &str, quarantine: &str) -> Result<()> {
    let reaped = backend.clean_dir(quarantine);
    if let Err(e) = &reaped {
        tracing::error!("cannot clean up quarantine, left for next startup: {}", e);
    }
    backend.mkdir(dir)?;
    reaped
}

fn erase_in_place(backend: &dyn Backend, namespace_path: &str) -> Result<()> {
    backend.clean_dir(namespace_path)?;
    backend.mkdir(path::directory(namespace_path))
}
