//! The Mentor — submission evaluation.
//!
//! Builds a multimodal request: the full assignment content as grounding
//! context, the student's free-text answer, and an optional inlined
//! image. The response must strictly conform to the evaluation contract;
//! a malformed or empty response is an [`EvaluationError`], never a
//! default score.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use pblforge_core::backend::{GenerationBackend, GenerationRequest};
use pblforge_core::error::EvaluationError;
use pblforge_core::model::{AiEvaluation, AssignmentContent};
use tracing::{debug, info};

use crate::schemas::evaluation_schema;

const DEFAULT_TEMPERATURE: f32 = 0.5;
const IMAGE_MIME: &str = "image/jpeg";

/// The submission-evaluation agent. Stateless; concurrent calls share
/// nothing.
pub struct Mentor {
    backend: Arc<dyn GenerationBackend>,
    temperature: f32,
}

impl Mentor {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Evaluate a submission against its assignment.
    ///
    /// `image_base64` is an optional photographed answer as a base64
    /// string; a `data:...;base64,` prefix is tolerated and stripped.
    pub async fn evaluate(
        &self,
        assignment: &AssignmentContent,
        submission_text: &str,
        image_base64: Option<&str>,
    ) -> Result<AiEvaluation, EvaluationError> {
        let prompt = Self::build_prompt(assignment, submission_text);
        let mut request =
            GenerationRequest::text(prompt, self.temperature).with_schema(evaluation_schema());

        if let Some(encoded) = image_base64 {
            let encoded = encoded
                .split_once(',')
                .map(|(_, data)| data)
                .unwrap_or(encoded);
            let bytes = BASE64
                .decode(encoded)
                .map_err(|e| EvaluationError::InvalidImage(e.to_string()))?;
            request = request.with_image(IMAGE_MIME, bytes);
        }

        info!(
            title = %assignment.title,
            with_image = image_base64.is_some(),
            "evaluating submission"
        );
        let text = self.backend.generate(request).await?;
        if text.trim().is_empty() {
            return Err(EvaluationError::EmptyResponse);
        }

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| EvaluationError::MalformedResponse(e.to_string()))?;
        evaluation_schema()
            .validate(&value)
            .map_err(|v| EvaluationError::SchemaViolation(v.to_string()))?;

        let evaluation: AiEvaluation = serde_json::from_value(value)
            .map_err(|e| EvaluationError::MalformedResponse(e.to_string()))?;

        debug!(score = evaluation.score, "submission evaluated");
        Ok(evaluation)
    }

    fn build_prompt(assignment: &AssignmentContent, submission_text: &str) -> String {
        let context =
            serde_json::to_string(assignment).unwrap_or_else(|_| assignment.title.clone());
        format!(
            "Role: You are an empathetic teacher focusing on both academic accuracy \
             and student psychological growth.\n\n\
             Assignment Context (JSON):\n{context}\n\n\
             Student Submission Text:\n\"{submission_text}\"\n\n\
             Requirements:\n\
             1. Language: All feedback, comments, and summaries MUST be in \
             Simplified Chinese (zh-CN).\n\
             2. Multi-modal: If an image is provided, analyze the image as part of \
             the answer.\n\
             3. Dimensions: Judge accuracy and creativity each as High, Medium, or \
             Low, and detect effort independently of correctness.\n\
             4. Psychological Support: If the work is poor but shows effort, use \
             \"Encouraging Feedback\". If good, use \"Challenge Feedback\".\n\
             5. Output: Return ONLY valid JSON adhering to the schema.\n"
        )
    }
}
