//! Store registry: a small, fixed set of named, mutable state containers.
//!
//! Each store is registered once under a [`StoreKind`], spawned immediately,
//! and destroyed exactly once at teardown. Concrete payload types belong to
//! the application; events borrow them while executing.
//!
//! [`StoreKind`]: rewind_common::StoreKind

pub mod registry;

pub use registry::StoreRegistry;
