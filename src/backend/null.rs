//! Null backend
//!
//! Accepts every write and stores nothing. Useful on targets without
//! persistent storage, where the store must still link and run.

use crate::error::{PrefsError, Result};

use super::{Backend, Capabilities};

/// Backend that forgets everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl Backend for NullBackend {
    fn capabilities(&self) -> Capabilities {
        Capabilities::staged()
    }

    fn init(&self) -> Result<()> {
        tracing::warn!("null backend in use, values will not be stored");
        Ok(())
    }

    fn mkdir(&self, _path: &str) -> Result<()> {
        Ok(())
    }

    fn exists(&self, _path: &str) -> bool {
        false
    }

    fn size(&self, _path: &str) -> Option<usize> {
        None
    }

    fn create(&self, _path: &str, data: &[u8]) -> Result<usize> {
        Ok(data.len())
    }

    fn read(&self, _path: &str, _buf: &mut [u8]) -> Result<usize> {
        Err(PrefsError::NotFound)
    }

    fn rename(&self, _from: &str, _to: &str) -> Result<()> {
        Ok(())
    }

    fn unlink(&self, _path: &str) -> Result<()> {
        Err(PrefsError::NotFound)
    }

    fn clean_dir(&self, _path: &str) -> Result<()> {
        Ok(())
    }

    fn list_dir(&self, _path: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
