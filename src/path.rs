//! Key path resolution
//!
//! Derives backend paths from (namespace, key) pairs and owns the two
//! reserved names used by the atomic protocols.
//!
//! ## Layout
//! ```text
//! {root}/{namespace}/{key}       live entry
//! {root}/{namespace}/\a_new?     staging file (put in progress)
//! {root}/\a_del?/                quarantine (clear in progress)
//! ```

/// Reserved file name a put writes before committing by rename
pub const STAGING_NAME: &str = "\u{7}_new?";

/// Reserved directory name a clear parks a namespace under
pub const QUARANTINE_NAME: &str = "\u{7}_del?";

/// Backend path separator
pub const SEPARATOR: char = '/';

/// True if `name` is one of the reserved internal names
pub fn is_reserved(name: &str) -> bool {
    name == STAGING_NAME || name == QUARANTINE_NAME
}

/// Join a directory path and a child name
pub fn join(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches(SEPARATOR);
    format!("{}{}{}", dir, SEPARATOR, name)
}

/// Path of the quarantine directory under `root`
pub fn quarantine_path(root: &str) -> String {
    join(root, QUARANTINE_NAME)
}

/// Directory path of a namespace, with a trailing separator
pub fn namespace_path(root: &str, namespace: &str) -> String {
    let mut path = join(root, namespace);
    path.push(SEPARATOR);
    path
}

/// Strip the trailing separator off a namespace path
pub fn directory(namespace_path: &str) -> &str {
    namespace_path.trim_end_matches(SEPARATOR)
}

/// Path of `key` inside a namespace path (which ends with a separator)
///
/// Keys are taken verbatim; validation happens in [`validate_key`].
pub fn key_path(namespace_path: &str, key: &str) -> String {
    format!("{}{}", namespace_path, key)
}

/// Path of the staging file inside a namespace path
pub fn staging_path(namespace_path: &str) -> String {
    key_path(namespace_path, STAGING_NAME)
}

/// A single path component that stays inside its parent directory
fn is_plain_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(SEPARATOR)
}

/// Namespace names: one plain path component, not reserved
pub fn validate_namespace(name: &str) -> bool {
    is_plain_component(name) && !is_reserved(name)
}

/// Keys: one plain path component, not reserved
///
/// A key equal to a reserved name would alias the staging file or the
/// quarantine directory.
pub fn validate_key(key: &str) -> bool {
    is_plain_component(key) && !is_reserved(key)
}
