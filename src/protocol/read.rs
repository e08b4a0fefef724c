//! Byte read path
//!
//! Size query followed by a bounded read. A value that does not fit the
//! caller's buffer is an error, never a truncated read.

use crate::error::{PrefsError, Result};
use crate::path;
use crate::root::StorageRoot;

/// Stored length of `key`, or `NotFound`
pub(crate) fn length(root: &StorageRoot, namespace_path: &str, key: &str) -> Result<usize> {
    root.backend()
        .size(&path::key_path(namespace_path, key))
        .ok_or(PrefsError::NotFound)
}

/// Read `key` into the front of `buf`, returns the value length
///
/// `buf` is left untouched on `NotFound` and `Capacity`.
pub(crate) fn read_into(
    root: &StorageRoot,
    namespace_path: &str,
    key: &str,
    buf: &mut [u8],
) -> Result<usize> {
    let source = path::key_path(namespace_path, key);

    let len = match root.backend().size(&source) {
        Some(len) => len,
        None => {
            tracing::debug!("value not found: {:?}", key);
            return Err(PrefsError::NotFound);
        }
    };
    if len == 0 {
        return Ok(0);
    }
    if len > buf.len() {
        tracing::warn!("not enough space in buffer: {} < {}", buf.len(), len);
        return Err(PrefsError::Capacity {
            stored: len,
            capacity: buf.len(),
        });
    }

    let read = root.backend().read(&source, &mut buf[..len])?;
    if read != len {
        return Err(PrefsError::Backend(format!(
            "short read of {:?}: {} of {} bytes",
            key, read, len
        )));
    }
    Ok(read)
}

/// Read `key` into a freshly allocated buffer
pub(crate) fn read_to_vec(root: &StorageRoot, namespace_path: &str, key: &str) -> Result<Vec<u8>> {
    let len = length(root, namespace_path, key)?;
    let max = root.config().max_value_size;
    if len > max {
        return Err(PrefsError::ValueTooLarge { len, max });
    }

    let mut value = vec![0u8; len];
    let read = read_into(root, namespace_path, key, &mut value)?;
    value.truncate(read);
    Ok(value)
}
