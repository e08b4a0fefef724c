//! Configuration for prefstore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::backend::Capabilities;

/// Main configuration for a prefstore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Layout Configuration
    // -------------------------------------------------------------------------
    /// Storage root inside the backend. Internal structure:
    ///   {root}/
    ///     ├── {namespace}/        (one directory per namespace)
    ///     │     └── {key}         (one file per key)
    ///     └── \a_del?/            (quarantine, only while a clear is reaped)
    pub root: String,

    // -------------------------------------------------------------------------
    // Backend Configuration
    // -------------------------------------------------------------------------
    /// Which backend to bind at startup
    pub backend: BackendKind,

    // -------------------------------------------------------------------------
    // Value Configuration
    // -------------------------------------------------------------------------
    /// Hard ceiling on a single value (in bytes)
    pub max_value_size: usize,

    /// Largest value the verify-skip path will compare in memory (in bytes)
    pub verify_limit: usize,

    // -------------------------------------------------------------------------
    // Recovery Configuration
    // -------------------------------------------------------------------------
    /// Unlink stray staging files left by an interrupted put during startup
    pub sweep_staging: bool,
}

/// Backend selected at startup
#[derive(Debug, Clone)]
pub enum BackendKind {
    /// Host filesystem rooted at `base_dir`
    Filesystem {
        base_dir: PathBuf,
        /// Clear namespaces by quarantine rename instead of in-place erase
        atomic_clear: bool,
    },

    /// Process-local memory (tests, simulations)
    Memory { capabilities: Capabilities },

    /// Stores nothing
    Null,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: "/nvs".to_string(),
            backend: BackendKind::Filesystem {
                base_dir: PathBuf::from("./prefstore_data"),
                atomic_clear: true,
            },
            max_value_size: 4096,
            verify_limit: 1024,
            sweep_staging: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the storage root inside the backend
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Set the backend
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    /// Use the filesystem backend under `base_dir`
    pub fn data_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        let atomic_clear = match self.config.backend {
            BackendKind::Filesystem { atomic_clear, .. } => atomic_clear,
            _ => true,
        };
        self.config.backend = BackendKind::Filesystem {
            base_dir: base_dir.into(),
            atomic_clear,
        };
        self
    }

    /// Set the maximum value size (in bytes)
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    /// Set the verify-skip comparison limit (in bytes)
    pub fn verify_limit(mut self, size: usize) -> Self {
        self.config.verify_limit = size;
        self
    }

    /// Enable or disable the startup staging sweep
    pub fn sweep_staging(mut self, enabled: bool) -> Self {
        self.config.sweep_staging = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
