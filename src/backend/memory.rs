//! In-memory backend
//!
//! A shared file tree kept in a `BTreeMap`, used for tests and crash
//! simulations. Cloning the backend shares the medium, so a clone handed to
//! a fresh `StorageRoot` behaves like the same flash after a reboot.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{PrefsError, Result};

use super::{Backend, Capabilities};

/// Operations that can be forced to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Init,
    Mkdir,
    Create,
    Rename,
    CleanDir,
}

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

#[derive(Debug, Default)]
struct Inner {
    /// Normalized path → node
    nodes: BTreeMap<String, Node>,
    /// Armed faults (fail until cleared)
    faults: HashSet<Fault>,
    /// Number of create/update calls that reached the medium
    writes: u64,
}

impl Inner {
    fn fail_if(&self, fault: Fault) -> Result<()> {
        if self.faults.contains(&fault) {
            Err(PrefsError::Backend(format!("injected {:?} failure", fault)))
        } else {
            Ok(())
        }
    }

    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn parent_is_dir(&self, path: &str) -> bool {
        match path.rsplit_once('/') {
            Some((parent, _)) => self.is_dir(parent),
            None => true,
        }
    }

    /// Paths strictly below `dir`
    fn descendants(&self, dir: &str) -> Vec<String> {
        let prefix = format!("{}/", dir);
        self.nodes
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .map(|(path, _)| path.clone())
            .collect()
    }
}

/// Backend backed by process memory
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
    capabilities: Capabilities,
}

impl MemoryBackend {
    /// Create an empty medium with flash-filesystem capabilities
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::atomic())
    }

    /// Create an empty medium advertising `capabilities`
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            capabilities,
        }
    }

    /// Arm a fault: the matching operation fails until cleared
    pub fn inject(&self, fault: Fault) {
        self.inner.lock().faults.insert(fault);
    }

    /// Disarm a fault
    pub fn clear_fault(&self, fault: Fault) {
        self.inner.lock().faults.remove(&fault);
    }

    /// Number of create/update calls that reached the medium
    pub fn write_count(&self) -> u64 {
        self.inner.lock().writes
    }

    /// Every path on the medium, sorted (for testing/debugging)
    pub fn paths(&self) -> Vec<String> {
        self.inner
            .lock()
            .nodes
            .keys()
            .map(|p| format!("/{}", p))
            .collect()
    }

    /// Strip separators so `/nvs/a/` and `/nvs/a` name the same node
    fn normalize(path: &str) -> String {
        path.trim_matches('/').to_string()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MemoryBackend {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn init(&self) -> Result<()> {
        self.inner.lock().fail_if(Fault::Init)
    }

    fn mkdir(&self, path: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.fail_if(Fault::Mkdir)?;
        let path = Self::normalize(path);
        match inner.nodes.get(&path) {
            Some(Node::Dir) => return Ok(()),
            Some(Node::File(_)) => {
                return Err(PrefsError::Backend(format!(
                    "mkdir failed, file exists: /{}",
                    path
                )));
            }
            None => {}
        }
        if !inner.parent_is_dir(&path) {
            return Err(PrefsError::NotFound);
        }
        inner.nodes.insert(path, Node::Dir);
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        let path = Self::normalize(path);
        self.inner.lock().nodes.contains_key(&path)
    }

    fn size(&self, path: &str) -> Option<usize> {
        match self.inner.lock().nodes.get(&Self::normalize(path)) {
            Some(Node::File(data)) => Some(data.len()),
            _ => None,
        }
    }

    fn create(&self, path: &str, data: &[u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        inner.fail_if(Fault::Create)?;
        let path = Self::normalize(path);
        if !inner.parent_is_dir(&path) {
            return Err(PrefsError::NotFound);
        }
        if let Some(Node::Dir) = inner.nodes.get(&path) {
            return Err(PrefsError::Backend(format!("is a directory: /{}", path)));
        }
        inner.nodes.insert(path, Node::File(data.to_vec()));
        inner.writes += 1;
        Ok(data.len())
    }

    fn read(&self, path: &str, buf: &mut [u8]) -> Result<usize> {
        match self.inner.lock().nodes.get(&Self::normalize(path)) {
            Some(Node::File(data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            Some(Node::Dir) => Err(PrefsError::Backend("is a directory".to_string())),
            None => Err(PrefsError::NotFound),
        }
    }

    /// Flash-style rewrite: overwrites from offset 0 and never shrinks
    fn update(&self, path: &str, data: &[u8]) -> Result<usize> {
        if !self.capabilities.in_place_update {
            return Err(PrefsError::Backend(
                "in-place update not supported by this backend".to_string(),
            ));
        }
        let mut inner = self.inner.lock();
        inner.fail_if(Fault::Create)?;
        match inner.nodes.get_mut(&Self::normalize(path)) {
            Some(Node::File(stored)) => {
                if stored.len() < data.len() {
                    stored.resize(data.len(), 0);
                }
                stored[..data.len()].copy_from_slice(data);
            }
            Some(Node::Dir) => return Err(PrefsError::Backend("is a directory".to_string())),
            None => return Err(PrefsError::NotFound),
        }
        inner.writes += 1;
        Ok(data.len())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.fail_if(Fault::Rename)?;
        let from = Self::normalize(from);
        let to = Self::normalize(to);
        if from == to {
            return Ok(());
        }
        if !inner.parent_is_dir(&to) {
            return Err(PrefsError::NotFound);
        }

        match inner.nodes.get(&from).cloned() {
            None => Err(PrefsError::NotFound),
            Some(Node::File(data)) => {
                if let Some(Node::Dir) = inner.nodes.get(&to) {
                    return Err(PrefsError::Backend(format!("is a directory: /{}", to)));
                }
                inner.nodes.remove(&from);
                inner.nodes.insert(to, Node::File(data));
                Ok(())
            }
            Some(Node::Dir) => {
                match inner.nodes.get(&to) {
                    Some(Node::File(_)) => {
                        return Err(PrefsError::Backend(format!("not a directory: /{}", to)));
                    }
                    Some(Node::Dir) if !inner.descendants(&to).is_empty() => {
                        return Err(PrefsError::Backend(format!(
                            "directory not empty: /{}",
                            to
                        )));
                    }
                    _ => {}
                }
                if to.starts_with(&format!("{}/", from)) {
                    return Err(PrefsError::Backend(
                        "cannot move a directory into itself".to_string(),
                    ));
                }

                let moved = inner.descendants(&from);
                inner.nodes.remove(&from);
                inner.nodes.insert(to.clone(), Node::Dir);
                for old in moved {
                    if let Some(node) = inner.nodes.remove(&old) {
                        let new = format!("{}{}", to, &old[from.len()..]);
                        inner.nodes.insert(new, node);
                    }
                }
                Ok(())
            }
        }
    }

    fn unlink(&self, path: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let path = Self::normalize(path);
        match inner.nodes.get(&path) {
            Some(Node::File(_)) => {
                inner.nodes.remove(&path);
                Ok(())
            }
            Some(Node::Dir) => Err(PrefsError::Backend(format!("is a directory: /{}", path))),
            None => Err(PrefsError::NotFound),
        }
    }

    fn clean_dir(&self, path: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.fail_if(Fault::CleanDir)?;
        let path = Self::normalize(path);
        if !inner.is_dir(&path) {
            return Err(PrefsError::NotFound);
        }
        for child in inner.descendants(&path) {
            inner.nodes.remove(&child);
        }
        Ok(())
    }

    fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        let inner = self.inner.lock();
        let path = Self::normalize(path);
        if !inner.is_dir(&path) {
            return Err(PrefsError::NotFound);
        }
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{}/", path)
        };
        Ok(inner
            .nodes
            .keys()
            .filter_map(|p| p.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect())
    }
}
