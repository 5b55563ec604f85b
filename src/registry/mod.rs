// src/registry/mod.rs

//! Process record state.
//!
//! - [`record`] defines [`ProcessId`], the per-process [`ProcessRecord`] and
//!   the [`OutputSnapshot`] view handed back to callers.
//! - [`store`] defines [`ProcessRegistry`], the single owner of all records.
//!
//! Everything here is synchronous and deterministic: no channels, no Tokio
//! types, no IO. The supervisor event loop in [`crate::engine`] is the only
//! writer, which is what upholds the append-only and single-transition
//! guarantees without per-record locking.

pub mod record;
pub mod store;

pub use record::{OutputSnapshot, ProcessId, ProcessRecord};
pub use store::ProcessRegistry;
