//! Filesystem backend
//!
//! Maps backend paths onto a base directory of the host filesystem.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{PrefsError, Result};

use super::{Backend, Capabilities};

/// Backend over `std::fs`
///
/// `/nvs/settings/volume` resolves to `{base_dir}/nvs/settings/volume`.
#[derive(Debug, Clone)]
pub struct FsBackend {
    base_dir: PathBuf,
    capabilities: Capabilities,
}

impl FsBackend {
    /// Create a backend rooted at `base_dir` (staged puts, quarantine clears)
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            capabilities: Capabilities::atomic(),
        }
    }

    /// Override the advertised strategy flags
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Translate a backend path to a host path
    pub fn host_path(&self, path: &str) -> PathBuf {
        let mut host = self.base_dir.clone();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            host.push(part);
        }
        host
    }

    /// Make a completed rename durable by syncing the parent directory
    #[cfg(unix)]
    fn sync_parent(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = File::open(parent).and_then(|d| d.sync_all()) {
                tracing::debug!("directory sync failed for {}: {}", parent.display(), e);
            }
        }
    }

    #[cfg(not(unix))]
    fn sync_parent(_path: &Path) {}
}

/// NotFound becomes the store's own not-found, everything else stays I/O
fn map_io(e: io::Error) -> PrefsError {
    if e.kind() == io::ErrorKind::NotFound {
        PrefsError::NotFound
    } else {
        PrefsError::Io(e)
    }
}

impl Backend for FsBackend {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }

    fn mkdir(&self, path: &str) -> Result<()> {
        let host = self.host_path(path);
        match fs::metadata(&host) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(PrefsError::Backend(format!(
                "mkdir failed, file exists: {}",
                path
            ))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir(&host)?;
                Ok(())
            }
            Err(e) => Err(PrefsError::Io(e)),
        }
    }

    fn exists(&self, path: &str) -> bool {
        fs::symlink_metadata(self.host_path(path)).is_ok()
    }

    fn size(&self, path: &str) -> Option<usize> {
        fs::metadata(self.host_path(path))
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len() as usize)
    }

    fn create(&self, path: &str, data: &[u8]) -> Result<usize> {
        let mut file = File::create(self.host_path(path)).map_err(map_io)?;
        file.write_all(data)?;
        file.sync_all()?;
        Ok(data.len())
    }

    fn read(&self, path: &str, buf: &mut [u8]) -> Result<usize> {
        let mut file = File::open(self.host_path(path)).map_err(map_io)?;
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(PrefsError::Io(e)),
            }
        }
        Ok(filled)
    }

    fn update(&self, path: &str, data: &[u8]) -> Result<usize> {
        let mut file = OpenOptions::new()
            .write(true)
            .open(self.host_path(path))
            .map_err(map_io)?;
        file.write_all(data)?;
        file.sync_all()?;
        Ok(data.len())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let to_host = self.host_path(to);
        fs::rename(self.host_path(from), &to_host).map_err(map_io)?;
        Self::sync_parent(&to_host);
        Ok(())
    }

    fn unlink(&self, path: &str) -> Result<()> {
        fs::remove_file(self.host_path(path)).map_err(map_io)
    }

    fn clean_dir(&self, path: &str) -> Result<()> {
        for entry in fs::read_dir(self.host_path(path)).map_err(map_io)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(entry.path())?;
            } else {
                fs::remove_file(entry.path())?;
            }
            tracing::debug!("erased {}", entry.path().display());
        }
        Ok(())
    }

    fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.host_path(path)).map_err(map_io)? {
            if let Ok(name) = entry?.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
