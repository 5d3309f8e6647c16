//! # PBLForge Core
//!
//! Domain types, traits, and error definitions for the PBLForge
//! knowledge-augmented assignment pipeline. This crate has **zero
//! framework dependencies** — it defines the domain model that all other
//! crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is defined as a trait here: the generation backend
//! ([`backend::GenerationBackend`]), the persistence store
//! ([`store::KeyValueStore`]). Implementations live in their respective
//! crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted mock backends
//! - Clean dependency graph (all crates depend inward on core)

pub mod backend;
pub mod error;
pub mod model;
pub mod schema;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use backend::{GenerationBackend, GenerationRequest, Part};
pub use error::{
    BackendError, Error, EvaluationError, GenerationError, ParseError, Result, StoreError,
};
pub use model::{
    AiEvaluation, Assignment, AssignmentContent, CustomCorpusRecord, Difficulty,
    EvaluationCriteria, FeedbackDimensions, Level, Submission, Task,
};
pub use schema::{Schema, Violation};
pub use store::KeyValueStore;
