//! Repository implementations.
//!
//! One repository per aggregate. The catalog repository is read-only: the
//! pricing engine consumes immutable snapshots, never live rows.

pub mod catalog;
