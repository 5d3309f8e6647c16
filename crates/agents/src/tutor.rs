//! The Tutor — in-progress hints.
//!
//! Unlike the other two agents this call has no structural schema; the
//! raw text is returned directly. A missing hint is a degraded but
//! non-blocking experience, so backend failures are swallowed and
//! replaced with a fixed fallback instead of surfacing an error.

use std::sync::Arc;

use pblforge_core::backend::{GenerationBackend, GenerationRequest};
use pblforge_core::model::AssignmentContent;
use tracing::{debug, warn};

const TEMPERATURE: f32 = 0.7;

/// Shown when the backend call fails outright.
pub const HINT_FALLBACK_OFFLINE: &str = "AI 助教暂时掉线了，请稍后再试。";

/// Shown when the backend answers with an empty body.
pub const HINT_FALLBACK_NUDGE: &str = "请再读一遍题目背景，尝试将不同学科的知识联系起来思考。";

/// The hint agent. Stateless; concurrent calls share nothing.
pub struct Tutor {
    backend: Arc<dyn GenerationBackend>,
}

impl Tutor {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Produce a short Socratic hint for the student's current draft.
    /// Never fails — degraded paths return a fallback string.
    pub async fn hint(&self, assignment: &AssignmentContent, current_draft: &str) -> String {
        let prompt = Self::build_prompt(assignment, current_draft);
        let request = GenerationRequest::text(prompt, TEMPERATURE);

        match self.backend.generate(request).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    debug!("tutor returned an empty body, using nudge fallback");
                    HINT_FALLBACK_NUDGE.to_string()
                } else {
                    text.to_string()
                }
            }
            Err(e) => {
                warn!(error = %e, "tutor backend failed, using offline fallback");
                HINT_FALLBACK_OFFLINE.to_string()
            }
        }
    }

    fn build_prompt(assignment: &AssignmentContent, current_draft: &str) -> String {
        let tasks =
            serde_json::to_string(&assignment.tasks).unwrap_or_else(|_| "[]".to_string());
        format!(
            "Role: You are a helpful tutor assisting a student with a \
             cross-disciplinary assignment.\n\n\
             Context:\n\
             Title: {}\n\
             Scenario: {}\n\
             Tasks: {tasks}\n\n\
             Student's Current Input (Draft): \"{current_draft}\"\n\n\
             Task: Provide a helpful, short hint (max 50 words) in Chinese.\n\
             Constraint: DO NOT give the answer directly. Guide the student to \
             think about the connection between the subjects or the scenario.\n\
             Tone: Encouraging and Socratic.\n",
            assignment.title, assignment.scenario,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use pblforge_core::error::BackendError;
    use pblforge_core::model::{EvaluationCriteria, Task};

    fn assignment() -> AssignmentContent {
        AssignmentContent {
            title: "微塑料对海洋的影响".into(),
            scenario: "你是一名海洋保护志愿者。".into(),
            tasks: vec![Task {
                id: 1,
                question: "微塑料如何进入食物链？".into(),
                subject_focus: "生物".into(),
            }],
            evaluation_criteria: EvaluationCriteria {
                knowledge_points: vec![],
                core_competencies: vec![],
            },
        }
    }

    #[tokio::test]
    async fn returns_backend_text_directly() {
        let backend = Arc::new(SequentialMockBackend::single_text(
            "想一想：塑料颗粒的大小和浮游生物的食性有什么关系？",
        ));
        let tutor = Tutor::new(backend);
        let hint = tutor.hint(&assignment(), "微塑料会被鱼吃掉").await;
        assert!(hint.contains("浮游生物"));
    }

    #[tokio::test]
    async fn backend_failure_yields_offline_fallback() {
        let backend = Arc::new(SequentialMockBackend::failing(BackendError::Network(
            "timed out".into(),
        )));
        let tutor = Tutor::new(backend);
        let hint = tutor.hint(&assignment(), "草稿").await;
        assert_eq!(hint, HINT_FALLBACK_OFFLINE);
    }

    #[tokio::test]
    async fn empty_body_yields_nudge_fallback() {
        let backend = Arc::new(SequentialMockBackend::single_text("  \n"));
        let tutor = Tutor::new(backend);
        let hint = tutor.hint(&assignment(), "草稿").await;
        assert_eq!(hint, HINT_FALLBACK_NUDGE);
    }

    #[tokio::test]
    async fn request_is_schema_free_and_grounded() {
        let backend = Arc::new(RecordingBackend::new("一个提示"));
        let tutor = Tutor::new(backend.clone());

        tutor.hint(&assignment(), "我觉得和洋流有关").await;

        let request = backend.last_request().unwrap();
        assert!(request.response_schema.is_none());

        let prompt = request.text_of_first_part();
        assert!(prompt.contains("微塑料对海洋的影响"));
        assert!(prompt.contains("海洋保护志愿者"));
        assert!(prompt.contains("我觉得和洋流有关"));
        assert!(prompt.contains("DO NOT give the answer"));
    }
}
