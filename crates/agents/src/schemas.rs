//! Declared structural contracts for the schema-constrained agents.
//!
//! These are the source of truth for both sides of a generation call:
//! rendered onto the wire for schema-guided decoding, and used to
//! validate the raw response before it is deserialized into domain
//! types.

use pblforge_core::schema::Schema;

/// The `AssignmentContent` contract enforced on Architect output.
pub fn assignment_schema() -> Schema {
    Schema::object(vec![
        (
            "title",
            Schema::string_described("Title of the assignment in Chinese"),
        ),
        (
            "scenario",
            Schema::string_described("The phenomenon-based scenario context in Chinese"),
        ),
        (
            "tasks",
            Schema::array(Schema::object(vec![
                ("id", Schema::integer()),
                (
                    "question",
                    Schema::string_described("The specific task question in Chinese"),
                ),
                (
                    "subject_focus",
                    Schema::string_described("The academic subject this task relates to"),
                ),
            ])),
        ),
        (
            "evaluation_criteria",
            Schema::object(vec![
                ("knowledge_points", Schema::array(Schema::string())),
                ("core_competencies", Schema::array(Schema::string())),
            ]),
        ),
    ])
}

/// The `AiEvaluation` contract enforced on Mentor output.
pub fn evaluation_schema() -> Schema {
    Schema::object(vec![
        (
            "score",
            Schema::number_bounded("Score from 0-100", 0.0, 100.0),
        ),
        (
            "feedback_summary",
            Schema::string_described("Encouraging summary in Chinese"),
        ),
        (
            "dimensions",
            Schema::object(vec![
                ("accuracy", Schema::string_enum(&["High", "Medium", "Low"])),
                ("creativity", Schema::string_enum(&["High", "Medium", "Low"])),
                ("effort_detected", Schema::boolean()),
            ]),
        ),
        (
            "detailed_comments",
            Schema::array(Schema::string_described("Specific comments in Chinese")),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assignment_schema_accepts_domain_shape() {
        let value = json!({
            "title": "火星殖民计划",
            "scenario": "你是火星基地的规划师",
            "tasks": [
                {"id": 1, "question": "计算辐射剂量", "subject_focus": "物理"},
                {"id": 2, "question": "设计温室生态", "subject_focus": "生物"}
            ],
            "evaluation_criteria": {
                "knowledge_points": ["能量守恒"],
                "core_competencies": ["建模"]
            }
        });
        assert!(assignment_schema().validate(&value).is_ok());
    }

    #[test]
    fn assignment_schema_rejects_missing_scenario() {
        let value = json!({
            "title": "t",
            "tasks": [],
            "evaluation_criteria": {"knowledge_points": [], "core_competencies": []}
        });
        let violation = assignment_schema().validate(&value).unwrap_err();
        assert!(violation.message.contains("scenario"));
    }

    #[test]
    fn evaluation_schema_bounds_the_score() {
        let mut value = json!({
            "score": 150,
            "feedback_summary": "很好",
            "dimensions": {"accuracy": "High", "creativity": "Low", "effort_detected": true},
            "detailed_comments": []
        });
        assert!(evaluation_schema().validate(&value).is_err());

        value["score"] = json!(85);
        assert!(evaluation_schema().validate(&value).is_ok());
    }

    #[test]
    fn evaluation_schema_rejects_unknown_levels() {
        let value = json!({
            "score": 50,
            "feedback_summary": "继续努力",
            "dimensions": {"accuracy": "Extreme", "creativity": "Low", "effort_detected": false},
            "detailed_comments": ["一条评语"]
        });
        let violation = evaluation_schema().validate(&value).unwrap_err();
        assert_eq!(violation.path, "$.dimensions.accuracy");
    }
}
