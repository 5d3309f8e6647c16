//! The file-staging queue — per-file lifecycle from upload to parsed
//! content or failure.
//!
//! Status transitions are monotonic along
//! `Pending → Parsing → {Success, Error}`; an entry never re-enters an
//! earlier state. Processing is intentionally serialized: each file's
//! parse is awaited to completion before the next begins, so a caller
//! polling the queue never observes two entries in `Parsing` at once.
//! Removal is permitted in any state; an in-flight parse whose entry was
//! removed completes and its result is discarded.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::parsers::{DocumentParser, UploadedFile};

/// Lifecycle state of one staged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagedStatus {
    Pending,
    Parsing,
    Success,
    Error,
}

/// One entry in the staging working set.
///
/// Working-set state scoped to a single authoring session — never
/// persisted.
#[derive(Debug, Clone)]
pub struct StagedFile {
    /// Opaque token, unique per staging session.
    pub id: String,
    pub file: UploadedFile,
    pub status: StagedStatus,
    pub extracted_text: Option<String>,
    pub error_message: Option<String>,
}

/// The staging queue. Owns the staged-file list exclusively; no other
/// component writes it.
pub struct StagingQueue {
    parser: Arc<dyn DocumentParser>,
    entries: Arc<RwLock<Vec<StagedFile>>>,
}

impl StagingQueue {
    pub fn new(parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            parser,
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append uploads as `Pending` entries, returning their new ids.
    pub async fn stage(&self, files: Vec<UploadedFile>) -> Vec<String> {
        let mut entries = self.entries.write().await;
        let mut ids = Vec::with_capacity(files.len());
        for file in files {
            let id = Uuid::new_v4().to_string();
            debug!(%id, name = %file.name, "staged file");
            entries.push(StagedFile {
                id: id.clone(),
                file,
                status: StagedStatus::Pending,
                extracted_text: None,
                error_message: None,
            });
            ids.push(id);
        }
        ids
    }

    /// Drive every `Pending` entry to a terminal state, one at a time,
    /// in submission order. A failed parse marks its own entry `Error`
    /// and never aborts the rest of the batch.
    pub async fn process(&self) {
        loop {
            // Claim the next pending entry, flipping it to Parsing.
            let next = {
                let mut entries = self.entries.write().await;
                match entries
                    .iter_mut()
                    .find(|e| e.status == StagedStatus::Pending)
                {
                    Some(entry) => {
                        entry.status = StagedStatus::Parsing;
                        Some((entry.id.clone(), entry.file.clone()))
                    }
                    None => None,
                }
            };

            let Some((id, file)) = next else { break };

            let result = self.parser.parse(&file).await;

            let mut entries = self.entries.write().await;
            match entries.iter_mut().find(|e| e.id == id) {
                Some(entry) => match result {
                    Ok(text) => {
                        debug!(%id, name = %file.name, chars = text.len(), "parse succeeded");
                        entry.status = StagedStatus::Success;
                        entry.extracted_text = Some(text);
                    }
                    Err(e) => {
                        warn!(%id, name = %file.name, error = %e, "parse failed");
                        entry.status = StagedStatus::Error;
                        entry.error_message = Some(e.to_string());
                    }
                },
                // Removed while parsing: drop the result.
                None => debug!(%id, name = %file.name, "entry removed mid-parse, result discarded"),
            }
        }
    }

    /// Drop an entry in any state. Does not cancel an in-flight parse.
    pub async fn remove(&self, id: &str) -> bool {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() < before
    }

    /// All entries, in insertion order.
    pub async fn list(&self) -> Vec<StagedFile> {
        self.entries.read().await.clone()
    }

    /// The `Success` entries, in insertion order.
    pub async fn successes(&self) -> Vec<StagedFile> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.status == StagedStatus::Success)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pblforge_core::error::ParseError;
    use tokio::sync::Notify;

    /// Succeeds with the file body; fails for names containing "bad".
    struct ScriptedParser;

    #[async_trait]
    impl DocumentParser for ScriptedParser {
        async fn parse(&self, file: &UploadedFile) -> Result<String, ParseError> {
            if file.name.contains("bad") {
                return Err(ParseError::Pdf("unreadable stream".into()));
            }
            Ok(String::from_utf8_lossy(&file.data).into_owned())
        }
    }

    /// Blocks each parse until the test releases it.
    struct GatedParser {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl DocumentParser for GatedParser {
        async fn parse(&self, file: &UploadedFile) -> Result<String, ParseError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(format!("parsed {}", file.name))
        }
    }

    fn upload(name: &str, content: &str) -> UploadedFile {
        UploadedFile::new(name, None, content.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn every_staged_entry_reaches_a_terminal_state() {
        let queue = StagingQueue::new(Arc::new(ScriptedParser));
        queue
            .stage(vec![
                upload("a.txt", "alpha"),
                upload("bad.pdf", ""),
                upload("c.txt", "gamma"),
            ])
            .await;

        queue.process().await;

        let entries = queue.list().await;
        assert_eq!(entries.len(), 3);
        assert!(entries
            .iter()
            .all(|e| matches!(e.status, StagedStatus::Success | StagedStatus::Error)));

        assert_eq!(entries[0].status, StagedStatus::Success);
        assert_eq!(entries[0].extracted_text.as_deref(), Some("alpha"));

        // The failure is recorded on its own entry and did not abort c.txt
        assert_eq!(entries[1].status, StagedStatus::Error);
        assert!(entries[1].error_message.as_deref().unwrap().contains("PDF"));
        assert_eq!(entries[2].status, StagedStatus::Success);
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let queue = StagingQueue::new(Arc::new(ScriptedParser));
        let ids = queue
            .stage(vec![upload("1.txt", "x"), upload("2.txt", "y"), upload("3.txt", "z")])
            .await;
        let listed: Vec<String> = queue.list().await.into_iter().map(|e| e.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn at_most_one_entry_is_parsing() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let queue = Arc::new(StagingQueue::new(Arc::new(GatedParser {
            started: started.clone(),
            release: release.clone(),
        })));

        queue
            .stage(vec![upload("first.txt", ""), upload("second.txt", "")])
            .await;

        let worker = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.process().await })
        };

        // First file mid-parse: exactly one Parsing, the other still Pending
        started.notified().await;
        let entries = queue.list().await;
        assert_eq!(entries[0].status, StagedStatus::Parsing);
        assert_eq!(entries[1].status, StagedStatus::Pending);

        release.notify_one();

        // Second file mid-parse: first already terminal
        started.notified().await;
        let entries = queue.list().await;
        assert_eq!(entries[0].status, StagedStatus::Success);
        assert_eq!(entries[1].status, StagedStatus::Parsing);

        release.notify_one();
        worker.await.unwrap();

        let entries = queue.list().await;
        assert!(entries.iter().all(|e| e.status == StagedStatus::Success));
    }

    #[tokio::test]
    async fn removal_mid_parse_discards_the_result() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let queue = Arc::new(StagingQueue::new(Arc::new(GatedParser {
            started: started.clone(),
            release: release.clone(),
        })));

        let ids = queue.stage(vec![upload("doomed.txt", "")]).await;

        let worker = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.process().await })
        };

        started.notified().await;
        assert!(queue.remove(&ids[0]).await);
        release.notify_one();
        worker.await.unwrap();

        // The late result was not re-inserted
        assert!(queue.list().await.is_empty());
    }

    #[tokio::test]
    async fn remove_works_in_any_state() {
        let queue = StagingQueue::new(Arc::new(ScriptedParser));
        let ids = queue
            .stage(vec![upload("keep.txt", "k"), upload("drop.txt", "d")])
            .await;

        // Remove while still Pending
        assert!(queue.remove(&ids[1]).await);
        queue.process().await;

        let entries = queue.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, ids[0]);

        // Remove after terminal state
        assert!(queue.remove(&ids[0]).await);
        assert!(queue.list().await.is_empty());

        // Removing an unknown id reports false
        assert!(!queue.remove("nope").await);
    }

    #[tokio::test]
    async fn successes_excludes_failures_and_keeps_order() {
        let queue = StagingQueue::new(Arc::new(ScriptedParser));
        queue
            .stage(vec![
                upload("one.txt", "1"),
                upload("bad.docx", ""),
                upload("two.txt", "2"),
            ])
            .await;
        queue.process().await;

        let names: Vec<String> = queue
            .successes()
            .await
            .into_iter()
            .map(|e| e.file.name)
            .collect();
        assert_eq!(names, vec!["one.txt", "two.txt"]);
    }

    #[tokio::test]
    async fn restaging_creates_a_new_identity() {
        let queue = StagingQueue::new(Arc::new(ScriptedParser));
        let first = queue.stage(vec![upload("same.txt", "v1")]).await;
        queue.process().await;
        queue.remove(&first[0]).await;

        let second = queue.stage(vec![upload("same.txt", "v2")]).await;
        assert_ne!(first[0], second[0]);

        let entries = queue.list().await;
        assert_eq!(entries[0].status, StagedStatus::Pending);
    }
}
