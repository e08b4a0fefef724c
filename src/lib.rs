//! # prefstore
//!
//! A namespaced key-value store for constrained devices, built on a plain
//! hierarchical file store:
//! - One directory per namespace, one file per key
//! - Atomic single-key update (stage, then commit by rename)
//! - Atomic namespace clear (quarantine, then reap)
//! - One-time startup recovery of interrupted clears and puts
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Preferences (session)                        │
//! │        begin / end, typed accessors, byte API                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ first begin()
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ StorageRoot │          │  Protocols  │
//!   │ (run-once)  │          │ put / clear │
//!   └──────┬──────┘          │    / read   │
//!          │                 └──────┬──────┘
//!          └────────────┬───────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │    Backend    │
//!               │ fs/memory/null│
//!               └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use prefstore::{Config, Preferences, StorageRoot};
//!
//! let root = Arc::new(StorageRoot::from_config(
//!     Config::builder().data_dir("./prefs").build(),
//! ));
//!
//! let mut prefs = Preferences::new(root);
//! prefs.begin("wifi", false)?;
//! prefs.put_string("ssid", "home")?;
//! assert_eq!(prefs.get_string("ssid", ""), "home");
//! prefs.end();
//! # Ok::<(), prefstore::PrefsError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod backend;
pub mod path;
pub mod root;
pub mod session;

mod protocol;
mod typed;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use backend::{Backend, Capabilities, FsBackend, MemoryBackend, NullBackend};
pub use config::{BackendKind, Config};
pub use error::{PrefsError, Result};
pub use root::StorageRoot;
pub use session::Preferences;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of prefstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
