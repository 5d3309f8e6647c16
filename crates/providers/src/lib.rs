//! Generation backend implementations for PBLForge.
//!
//! The [`pblforge_core::backend::GenerationBackend`] trait is the
//! collaborator contract; this crate provides the Gemini REST
//! implementation. Agents only ever see the trait.

pub mod gemini;

pub use gemini::GeminiBackend;
