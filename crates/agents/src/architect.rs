//! The Architect — assignment generation.
//!
//! Builds a schema-guided generation request from topic + subjects +
//! difficulty + corpus, then runs the validate-then-deserialize pass on
//! the raw response. A failure at any step is a [`GenerationError`]; no
//! partial or best-effort assignment is ever returned.

use std::collections::HashSet;
use std::sync::Arc;

use pblforge_core::backend::{GenerationBackend, GenerationRequest};
use pblforge_core::error::GenerationError;
use pblforge_core::model::{AssignmentContent, Difficulty};
use tracing::{debug, info};

use crate::schemas::assignment_schema;

const DEFAULT_TEMPERATURE: f32 = 0.7;

/// The assignment-generation agent. Stateless — create one and reuse it;
/// concurrent calls share nothing.
pub struct Architect {
    backend: Arc<dyn GenerationBackend>,
    temperature: f32,
}

impl Architect {
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

    /// Generate a cross-disciplinary assignment.
    ///
    /// `corpus` is the prompt-ready knowledge corpus; pass an empty
    /// string to generate from the model's own knowledge only.
    pub async fn generate(
        &self,
        topic: &str,
        subjects: &[String],
        difficulty: Difficulty,
        corpus: &str,
    ) -> Result<AssignmentContent, GenerationError> {
        if topic.trim().is_empty() {
            return Err(GenerationError::InvalidInput("topic must not be empty".into()));
        }
        if subjects.is_empty() {
            return Err(GenerationError::InvalidInput(
                "at least one subject is required".into(),
            ));
        }

        let prompt = Self::build_prompt(topic, subjects, difficulty, corpus);
        let request =
            GenerationRequest::text(prompt, self.temperature).with_schema(assignment_schema());

        info!(topic, subjects = subjects.len(), %difficulty, "generating assignment");
        let text = self.backend.generate(request).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        assignment_schema()
            .validate(&value)
            .map_err(|v| GenerationError::SchemaViolation(v.to_string()))?;

        let content: AssignmentContent = serde_json::from_value(value)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        // Post-conditions the schema alone cannot express.
        if content.tasks.is_empty() {
            return Err(GenerationError::SchemaViolation(
                "at $.tasks: tasks must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for task in &content.tasks {
            if !seen.insert(task.id) {
                return Err(GenerationError::SchemaViolation(format!(
                    "at $.tasks: duplicate task id {}",
                    task.id
                )));
            }
        }

        debug!(title = %content.title, tasks = content.tasks.len(), "assignment generated");
        Ok(content)
    }

    fn build_prompt(
        topic: &str,
        subjects: &[String],
        difficulty: Difficulty,
        corpus: &str,
    ) -> String {
        let mut prompt = format!(
            "Role: You are an expert educational designer specializing in \
             Phenomenon-based Learning (PBL).\n\
             Task: Create a cross-disciplinary homework assignment.\n\n\
             Inputs:\n\
             - Topic: {topic}\n\
             - Subjects: {}\n\
             - Difficulty: {difficulty}\n",
            subjects.join(", "),
        );

        if !corpus.trim().is_empty() {
            prompt.push_str(&format!(
                "\nReference knowledge base (ground the scenario and tasks in \
                 this material where relevant):\n{corpus}\n"
            ));
        }

        prompt.push_str(
            "\nRequirements:\n\
             1. Language: All generated content (Title, Scenario, Tasks, Criteria) \
             MUST be in Simplified Chinese (zh-CN).\n\
             2. Deep Integration: Do not just list questions. Create a scenario that \
             requires knowledge from all selected subjects to solve.\n\
             3. Difficulty: If 'challenge', include open-ended inquiry tasks. \
             If 'basic', focus on foundational concepts.\n\
             4. Output: Return ONLY valid JSON adhering to the schema.\n",
        );
        prompt
    }
}
