//! Assignment, submission, and evaluation domain types.
//!
//! These are the value objects that flow through the pipeline:
//! a teacher's topic + subjects → generated `AssignmentContent` →
//! student `Submission` → `AiEvaluation`. Wire names are snake_case and
//! match the structural contracts the agents declare.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Depth gate for generated tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Foundational recall tasks, first connections between subjects.
    Basic,
    /// Open-ended inquiry tasks requiring justification.
    Challenge,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Challenge => write!(f, "challenge"),
        }
    }
}

/// A single task within a generated assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Sequence id, unique within the assignment.
    pub id: i64,
    /// The task question text.
    pub question: String,
    /// Which academic subject this task leans on.
    pub subject_focus: String,
}

/// Grading rubric attached to a generated assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationCriteria {
    pub knowledge_points: Vec<String>,
    pub core_competencies: Vec<String>,
}

/// The structured content produced by the generation agent.
///
/// Produced once per generation call and immutable thereafter; owned by
/// the [`Assignment`] that embeds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentContent {
    pub title: String,
    /// The phenomenon-based scenario grounding all tasks.
    pub scenario: String,
    pub tasks: Vec<Task>,
    pub evaluation_criteria: EvaluationCriteria,
}

/// A published assignment: the generation inputs plus the content they
/// produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub topic: String,
    pub subjects: Vec<String>,
    pub difficulty: Difficulty,
    pub content: AssignmentContent,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Create a new assignment with a fresh id and timestamp.
    pub fn new(
        topic: impl Into<String>,
        subjects: Vec<String>,
        difficulty: Difficulty,
        content: AssignmentContent,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            topic: topic.into(),
            subjects,
            difficulty,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Ordinal rating used for the accuracy and creativity dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    High,
    Medium,
    Low,
}

/// Per-dimension judgments attached to an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackDimensions {
    pub accuracy: Level,
    pub creativity: Level,
    /// Effort is judged independently of correctness.
    pub effort_detected: bool,
}

/// The structured result of evaluating one submission.
///
/// Produced once per evaluation and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiEvaluation {
    /// Overall score in [0, 100].
    pub score: f64,
    pub feedback_summary: String,
    pub dimensions: FeedbackDimensions,
    pub detailed_comments: Vec<String>,
}

/// A student's answer to an assignment, with the evaluation attached
/// after it completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub assignment_id: String,
    pub student_name: String,
    pub content_text: String,
    /// Optional photographed work, stored as a base64 string
    /// (a `data:` URL prefix is tolerated and stripped at evaluation time).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_evaluation: Option<AiEvaluation>,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Create a new, not-yet-evaluated submission.
    pub fn new(
        assignment_id: impl Into<String>,
        student_name: impl Into<String>,
        content_text: impl Into<String>,
        image_data: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            assignment_id: assignment_id.into(),
            student_name: student_name.into(),
            content_text: content_text.into(),
            image_data,
            ai_evaluation: None,
            created_at: Utc::now(),
        }
    }
}

/// The persisted custom knowledge corpus.
///
/// At most one record exists; promotion overwrites it wholesale.
/// The wire shape keeps the original record's camelCase field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomCorpusRecord {
    pub content: String,
    /// Human-readable list of the file names that were promoted.
    #[serde(rename = "fileName")]
    pub source_label: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Difficulty::Basic).unwrap(), "\"basic\"");
        assert_eq!(
            serde_json::to_string(&Difficulty::Challenge).unwrap(),
            "\"challenge\""
        );
    }

    #[test]
    fn level_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Level::High).unwrap(), "\"High\"");
        let parsed: Level = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(parsed, Level::Medium);
    }

    #[test]
    fn assignment_content_wire_names() {
        let content = AssignmentContent {
            title: "题目".into(),
            scenario: "情境".into(),
            tasks: vec![Task {
                id: 1,
                question: "问题".into(),
                subject_focus: "物理".into(),
            }],
            evaluation_criteria: EvaluationCriteria {
                knowledge_points: vec!["动量".into()],
                core_competencies: vec!["建模".into()],
            },
        };
        let json = serde_json::to_string(&content).unwrap();
        assert!(json.contains("subject_focus"));
        assert!(json.contains("evaluation_criteria"));
        assert!(json.contains("knowledge_points"));
        assert!(json.contains("core_competencies"));
    }

    #[test]
    fn submission_roundtrip_without_optional_fields() {
        let sub = Submission::new("a1", "小明", "我的答案", None);
        let json = serde_json::to_string(&sub).unwrap();
        assert!(!json.contains("image_data"));
        assert!(!json.contains("ai_evaluation"));
        let back: Submission = serde_json::from_str(&json).unwrap();
        assert_eq!(back.assignment_id, "a1");
        assert!(back.ai_evaluation.is_none());
    }

    #[test]
    fn custom_corpus_record_uses_original_wire_names() {
        let record = CustomCorpusRecord {
            content: "碳中和".into(),
            source_label: "notes.txt".into(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"fileName\":\"notes.txt\""));
        assert!(json.contains("updatedAt"));
    }
}
