//! GenerationBackend trait — the abstraction over remote text-generation
//! models.
//!
//! A backend knows how to send a multimodal prompt to a generative model
//! and return the raw response text. When a request carries a response
//! schema, the backend asks the model for schema-guided decoding; the
//! agents still re-validate the result (see [`crate::schema`]) because
//! the model is non-deterministic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::schema::Schema;

/// One part of a multimodal prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    Text { text: String },
    /// Raw image bytes, inlined into the request by the backend.
    InlineImage { mime_type: String, data: Vec<u8> },
}

/// A single generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The prompt parts, in order. Text first, then any images.
    pub parts: Vec<Part>,

    /// When set, the backend is asked to decode against this contract
    /// and the response is expected to parse as JSON.
    pub response_schema: Option<Schema>,

    /// Sampling temperature (0.0 = deterministic).
    pub temperature: f32,
}

impl GenerationRequest {
    /// A plain text request.
    pub fn text(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            parts: vec![Part::Text {
                text: prompt.into(),
            }],
            response_schema: None,
            temperature,
        }
    }

    /// Attach a structural output contract.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Append an inline image part.
    pub fn with_image(mut self, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.parts.push(Part::InlineImage {
            mime_type: mime_type.into(),
            data,
        });
        self
    }
}

/// The core backend trait.
///
/// Implementations are stateless per call: agents may issue concurrent
/// requests against one backend with no shared mutable state.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send the request and return the raw response text.
    ///
    /// An empty string is a valid return — callers decide whether an
    /// empty body is an error for their contract.
    async fn generate(&self, request: GenerationRequest)
        -> std::result::Result<String, BackendError>;
}
