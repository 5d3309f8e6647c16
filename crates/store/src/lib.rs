//! Persistence for PBLForge — key-value store backends and the typed
//! repository layer over them.
//!
//! The [`pblforge_core::store::KeyValueStore`] trait is the collaborator
//! contract; this crate provides an in-memory implementation (testing,
//! ephemeral sessions) and a file-backed one (one JSON file per key),
//! plus [`Repository`] for the three persisted collections.

pub mod file_backend;
pub mod in_memory;
pub mod repository;

pub use file_backend::FileStore;
pub use in_memory::MemoryStore;
pub use repository::Repository;
