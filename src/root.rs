//! Storage Root
//!
//! Owns the backend and the one-time initialization of the storage root.
//!
//! ## Responsibilities
//! - Bring the backend up and create the root directory
//! - Reap a quarantine left behind by a clear that was interrupted
//! - Sweep staging files left behind by a put that was interrupted
//! - Remember that all of the above succeeded, so it runs once per process
//!
//! ## Startup Sequence
//! ```text
//! backend.init() ──► mkdir(root) ──► reap quarantine ──► sweep staging ──► ready
//!      │                 │          (atomic rename only)  (if enabled)
//!      └── error ────────┴──► Init error, ready stays false, next open retries
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{self, Backend};
use crate::config::Config;
use crate::error::{PrefsError, Result};
use crate::path;

/// Process-wide storage context shared by every namespace session
///
/// ## Concurrency:
/// - `ready`: Mutex-guarded so two first-opens racing on different threads
///   run the startup sequence exactly once
/// - Everything else is immutable after construction
pub struct StorageRoot {
    /// Store configuration
    config: Config,

    /// The medium all protocols run against
    backend: Arc<dyn Backend>,

    /// Set once the startup sequence has completed
    ready: Mutex<bool>,
}

impl StorageRoot {
    /// Create a root over an explicit backend
    pub fn new(config: Config, backend: Arc<dyn Backend>) -> Self {
        Self {
            config,
            backend,
            ready: Mutex::new(false),
        }
    }

    /// Create a root over the backend named by the configuration
    pub fn from_config(config: Config) -> Self {
        let backend = backend::from_config(&config);
        Self::new(config, backend)
    }

    /// Run the startup sequence if it has not completed yet
    ///
    /// Only the first successful call does work; later calls return
    /// immediately. A failed call leaves the root not ready.
    pub fn ensure_ready(&self) -> Result<()> {
        let mut ready = self.ready.lock();
        if *ready {
            return Ok(());
        }

        // Step 1: Bring the backend up
        if let Err(e) = self.backend.init() {
            tracing::error!("backend not initialized: {}", e);
            return Err(PrefsError::Init(format!("backend init failed: {}", e)));
        }

        // Step 2: Make sure the root directory exists
        if let Err(e) = self.backend.mkdir(&self.config.root) {
            tracing::error!("cannot create storage root {}: {}", self.config.root, e);
            return Err(PrefsError::Init(format!(
                "cannot create storage root {}: {}",
                self.config.root, e
            )));
        }

        // Step 3: Finish a clear that committed its rename but never reaped
        if self.backend.capabilities().atomic_dir_rename {
            self.reap_quarantine();
        }

        // Step 4: Drop staged values that never got committed
        if self.config.sweep_staging {
            self.sweep_staging();
        }

        *ready = true;
        tracing::info!("storage root {} ready", self.config.root);
        Ok(())
    }

    /// True once the startup sequence has completed
    pub fn is_ready(&self) -> bool {
        *self.ready.lock()
    }

    /// Get the backend
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the storage root path
    pub fn root(&self) -> &str {
        &self.config.root
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn reap_quarantine(&self) {
        let quarantine = path::quarantine_path(&self.config.root);
        if !self.backend.exists(&quarantine) {
            return;
        }
        match self.backend.clean_dir(&quarantine) {
            Ok(()) => tracing::info!("reaped quarantined namespace at {:?}", quarantine),
            Err(e) => tracing::error!("cannot clean up a deleted namespace: {}", e),
        }
    }

    fn sweep_staging(&self) {
        let names = match self.backend.list_dir(&self.config.root) {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("cannot list storage root for staging sweep: {}", e);
                return;
            }
        };

        for name in names.iter().filter(|n| path::validate_namespace(n)) {
            let staging = path::staging_path(&path::namespace_path(&self.config.root, name));
            if !self.backend.exists(&staging) {
                continue;
            }
            match self.backend.unlink(&staging) {
                Ok(()) => tracing::info!("swept uncommitted staging file in namespace {}", name),
                Err(e) => tracing::warn!("cannot sweep staging file in namespace {}: {}", name, e),
            }
        }
    }
}
