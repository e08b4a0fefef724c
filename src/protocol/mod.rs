//! Protocol Module
//!
//! The write, clear and read paths of a namespace.
//!
//! ## Responsibilities
//! - Atomic single-key put (verify-skip, in-place update, stage-and-rename)
//! - Atomic namespace clear (quarantine-then-reap, or erase in place)
//! - Bounded reads that never truncate
//!
//! ## Put Decision Procedure
//! ```text
//!            exists(key)?
//!           /            \
//!         no              yes
//!         │                │
//!    create(key)     verify == value? ──yes──► skip, report len
//!                          │ no
//!               in_place_update?
//!              /                \
//!            yes                 no
//!             │                   │
//!   grow: update(key)      create(staging)
//!   shrink: create(key)    rename(staging → key)   ◄── commit point
//! ```
//!
//! Callers (the namespace session) validate the session state, the key and
//! the value size before reaching this module.

mod clear;
mod put;
mod read;

pub(crate) use clear::clear;
pub(crate) use put::put;
pub(crate) use read::{length, read_into, read_to_vec};
