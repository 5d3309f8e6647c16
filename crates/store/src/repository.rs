//! Repository layer over the key-value collaborator.
//!
//! Three logical keys: the assignments list (append-only), the
//! submissions list (upsert by id), and the single custom-knowledge-base
//! record. Values are whole JSON documents; read-modify-write is fine
//! because both mutating owners are single-threaded over the store.

use pblforge_core::error::StoreError;
use pblforge_core::model::{Assignment, CustomCorpusRecord, Submission};
use pblforge_core::store::KeyValueStore;
use std::sync::Arc;
use tracing::debug;

const KEY_ASSIGNMENTS: &str = "assignments";
const KEY_SUBMISSIONS: &str = "submissions";
const KEY_KNOWLEDGE_BASE: &str = "custom_knowledge_base";

/// Typed access to the three persisted collections.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KeyValueStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // --- Assignments (append-only) ---

    pub async fn save_assignment(&self, assignment: &Assignment) -> Result<(), StoreError> {
        let mut all = self.assignments().await?;
        all.push(assignment.clone());
        let value =
            serde_json::to_value(&all).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.put(KEY_ASSIGNMENTS, value).await?;
        debug!(id = %assignment.id, "assignment saved");
        Ok(())
    }

    pub async fn assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        match self.store.get(KEY_ASSIGNMENTS).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    pub async fn assignment_by_id(&self, id: &str) -> Result<Option<Assignment>, StoreError> {
        Ok(self.assignments().await?.into_iter().find(|a| a.id == id))
    }

    // --- Submissions (upsert by id) ---

    pub async fn save_submission(&self, submission: &Submission) -> Result<(), StoreError> {
        let mut all = self.submissions().await?;
        match all.iter_mut().find(|s| s.id == submission.id) {
            Some(existing) => *existing = submission.clone(),
            None => all.push(submission.clone()),
        }
        let value =
            serde_json::to_value(&all).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.put(KEY_SUBMISSIONS, value).await?;
        debug!(id = %submission.id, "submission saved");
        Ok(())
    }

    pub async fn submissions(&self) -> Result<Vec<Submission>, StoreError> {
        match self.store.get(KEY_SUBMISSIONS).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    pub async fn submissions_by_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<Submission>, StoreError> {
        Ok(self
            .submissions()
            .await?
            .into_iter()
            .filter(|s| s.assignment_id == assignment_id)
            .collect())
    }

    // --- Custom knowledge base (single record) ---

    pub async fn custom_corpus(&self) -> Result<Option<CustomCorpusRecord>, StoreError> {
        match self.store.get(KEY_KNOWLEDGE_BASE).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    pub async fn put_custom_corpus(&self, record: &CustomCorpusRecord) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.put(KEY_KNOWLEDGE_BASE, value).await
    }

    pub async fn delete_custom_corpus(&self) -> Result<(), StoreError> {
        self.store.delete(KEY_KNOWLEDGE_BASE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::MemoryStore;
    use chrono::Utc;
    use pblforge_core::model::{
        AssignmentContent, Difficulty, EvaluationCriteria, Task,
    };

    fn repo() -> Repository {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    fn sample_content() -> AssignmentContent {
        AssignmentContent {
            title: "火星基地的能量预算".into(),
            scenario: "你是火星基地的首席工程师".into(),
            tasks: vec![Task {
                id: 1,
                question: "计算太阳能板输出".into(),
                subject_focus: "物理".into(),
            }],
            evaluation_criteria: EvaluationCriteria {
                knowledge_points: vec!["能量守恒".into()],
                core_competencies: vec!["建模".into()],
            },
        }
    }

    #[tokio::test]
    async fn assignments_append_in_order() {
        let repo = repo();
        let a1 = Assignment::new("火星", vec!["物理".into()], Difficulty::Basic, sample_content());
        let a2 = Assignment::new("海洋", vec!["生物".into()], Difficulty::Challenge, sample_content());
        repo.save_assignment(&a1).await.unwrap();
        repo.save_assignment(&a2).await.unwrap();

        let all = repo.assignments().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a1.id);
        assert_eq!(all[1].id, a2.id);

        let found = repo.assignment_by_id(&a2.id).await.unwrap().unwrap();
        assert_eq!(found.topic, "海洋");
    }

    #[tokio::test]
    async fn submissions_upsert_by_id() {
        let repo = repo();
        let mut sub = Submission::new("a1", "小红", "第一版答案", None);
        repo.save_submission(&sub).await.unwrap();

        sub.content_text = "修改后的答案".into();
        repo.save_submission(&sub).await.unwrap();

        let all = repo.submissions().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content_text, "修改后的答案");
    }

    #[tokio::test]
    async fn submissions_filter_by_assignment() {
        let repo = repo();
        repo.save_submission(&Submission::new("a1", "甲", "x", None))
            .await
            .unwrap();
        repo.save_submission(&Submission::new("a2", "乙", "y", None))
            .await
            .unwrap();
        repo.save_submission(&Submission::new("a1", "丙", "z", None))
            .await
            .unwrap();

        let for_a1 = repo.submissions_by_assignment("a1").await.unwrap();
        assert_eq!(for_a1.len(), 2);
        assert!(for_a1.iter().all(|s| s.assignment_id == "a1"));
    }

    #[tokio::test]
    async fn custom_corpus_record_lifecycle() {
        let repo = repo();
        assert!(repo.custom_corpus().await.unwrap().is_none());

        let record = CustomCorpusRecord {
            content: "FILE: notes.txt\n碳中和".into(),
            source_label: "notes.txt".into(),
            updated_at: Utc::now(),
        };
        repo.put_custom_corpus(&record).await.unwrap();

        let loaded = repo.custom_corpus().await.unwrap().unwrap();
        assert_eq!(loaded.source_label, "notes.txt");
        assert!(loaded.content.contains("碳中和"));

        repo.delete_custom_corpus().await.unwrap();
        assert!(repo.custom_corpus().await.unwrap().is_none());
    }
}
