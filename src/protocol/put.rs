//! Atomic put
//!
//! Writes one key so that an interruption at any point leaves either the old
//! value or the new value readable, never a mix of both (on backends that
//! stage). In-place backends trade that guarantee for fewer writes.

use crate::backend::Backend;
use crate::error::{PrefsError, Result};
use crate::path;
use crate::root::StorageRoot;

/// Write `value` under `key` in the namespace at `namespace_path`
///
/// Returns the number of bytes the key now holds.
pub(crate) fn put(
    root: &StorageRoot,
    namespace_path: &str,
    key: &str,
    value: &[u8],
) -> Result<usize> {
    let backend = root.backend();
    let target = path::key_path(namespace_path, key);

    // Fresh key: nothing to protect, write directly
    if !backend.exists(&target) {
        return backend.create(&target, value);
    }

    // Identical content: spare the medium
    if backend.verify(&target, value, root.config().verify_limit) {
        tracing::debug!("data matches, skip writing to {:?}", target);
        return Ok(value.len());
    }

    if backend.capabilities().in_place_update {
        update_in_place(backend, &target, value)
    } else {
        stage_and_commit(backend, namespace_path, &target, value)
    }
}

/// Rewrite from offset 0; a shorter value recreates the file so no tail of
/// the old value survives
fn update_in_place(backend: &dyn Backend, target: &str, value: &[u8]) -> Result<usize> {
    match backend.size(target) {
        Some(stored) if stored <= value.len() => backend.update(target, value),
        _ => backend.create(target, value),
    }
}

/// Write the staging file, then rename it over the live entry
fn stage_and_commit(
    backend: &dyn Backend,
    namespace_path: &str,
    target: &str,
    value: &[u8],
) -> Result<usize> {
    let staging = path::staging_path(namespace_path);

    let written = backend.create(&staging, value)?;
    if written != value.len() {
        tracing::warn!(
            "short staged write for {:?}: {} of {} bytes, not committing",
            target,
            written,
            value.len()
        );
        return Err(PrefsError::Backend(format!(
            "short write: {} of {} bytes",
            written,
            value.len()
        )));
    }

    // Commit point: before this the old value is live, after it the new one
    if let Err(e) = backend.rename(&staging, target) {
        tracing::warn!("cannot commit staged value to {:?}: {}", target, e);
        return Err(e);
    }

    Ok(written)
}
