//! Knowledge-base assembly: merging the active base corpus with
//! same-session staged uploads, and promoting staged material into the
//! durable custom corpus.
//!
//! Two tiers: the active base (built-in default, or the persisted custom
//! corpus) and an ephemeral supplementary section built from staged
//! `Success` entries. Ephemeral merges never mutate the persisted
//! corpus; promotion is the only write path, and a rejected write
//! (capacity) leaves both staging and the active mode untouched.

use chrono::Utc;
use pblforge_core::error::{Error, Result};
use pblforge_core::model::CustomCorpusRecord;
use pblforge_ingest::{StagedFile, StagedStatus, StagingQueue};
use pblforge_store::Repository;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// The built-in default corpus, used until a custom one is promoted.
pub const DEFAULT_CORPUS: &str = "\
跨学科主题学习参考材料（内置）

现象式学习（Phenomenon-based Learning）以真实世界的现象为起点，\
围绕一个情境整合多学科知识。设计任务时应注意：

一、情境先行。任务必须嵌入一个具体、可感知的现象，\
而不是抽象的知识点罗列。

二、深度融合。每个任务应要求学生同时调用至少两个学科的知识，\
学科之间的连接点即是任务的核心。

三、梯度设计。基础任务侧重概念理解与初步联系；\
挑战任务应是开放式的，要求论证、权衡与创造性方案。

四、评价导向。评价标准应同时覆盖知识点的掌握与核心素养\
（建模、论证、合作、批判性思维）的表现。";

/// Which base corpus is active. Explicit state — passed by reference,
/// never ambient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeMode {
    Default,
    Custom,
}

struct KnowledgeState {
    mode: KnowledgeMode,
    custom: Option<CustomCorpusRecord>,
}

/// Owns the `{mode, custom}` state and the persisted-corpus record.
/// The only component that writes the custom-knowledge-base key.
pub struct KnowledgeBase {
    repo: Repository,
    state: RwLock<KnowledgeState>,
}

const SUPPLEMENT_HEADER: &str = "===== 补充材料（本次上传，未入库） =====";

impl KnowledgeBase {
    /// Load the knowledge base, picking up a previously promoted corpus
    /// if one is persisted.
    pub async fn load(repo: Repository) -> Result<Self> {
        let custom = repo.custom_corpus().await?;
        let mode = if custom.is_some() {
            KnowledgeMode::Custom
        } else {
            KnowledgeMode::Default
        };
        debug!(?mode, "knowledge base loaded");
        Ok(Self {
            repo,
            state: RwLock::new(KnowledgeState { mode, custom }),
        })
    }

    pub async fn mode(&self) -> KnowledgeMode {
        self.state.read().await.mode
    }

    pub async fn custom_record(&self) -> Option<CustomCorpusRecord> {
        self.state.read().await.custom.clone()
    }

    /// The prompt-ready corpus: the full active base, plus any staged
    /// `Success` entries under a supplementary-material section, each
    /// demarcated with a header naming its originating file.
    pub async fn active_corpus(&self, staged: &[StagedFile]) -> String {
        let state = self.state.read().await;
        let base = match (&state.mode, &state.custom) {
            (KnowledgeMode::Custom, Some(record)) => record.content.as_str(),
            _ => DEFAULT_CORPUS,
        };

        let ready: Vec<&StagedFile> = staged
            .iter()
            .filter(|f| f.status == StagedStatus::Success)
            .collect();
        if ready.is_empty() {
            return base.to_string();
        }

        let mut corpus = String::from(base);
        corpus.push_str("\n\n");
        corpus.push_str(SUPPLEMENT_HEADER);
        for entry in ready {
            corpus.push_str(&format!(
                "\n\nFILE: {}\n{}",
                entry.file.name,
                entry.extracted_text.as_deref().unwrap_or_default()
            ));
        }
        corpus
    }

    /// Persist the selected staged `Success` entries as the new custom
    /// corpus, switch the active mode to `Custom`, and clear the
    /// promoted entries from staging.
    ///
    /// The store write happens first: a `CapacityExceeded` rejection
    /// surfaces here with staging and mode left exactly as they were,
    /// so the caller may retry with a smaller selection.
    pub async fn promote(
        &self,
        queue: &StagingQueue,
        ids: &[String],
    ) -> Result<CustomCorpusRecord> {
        let selected: Vec<StagedFile> = queue
            .successes()
            .await
            .into_iter()
            .filter(|f| ids.contains(&f.id))
            .collect();

        if selected.is_empty() {
            return Err(Error::Internal(
                "promotion selection contains no parsed files".into(),
            ));
        }

        let content = selected
            .iter()
            .map(|f| {
                format!(
                    "FILE: {}\n{}",
                    f.file.name,
                    f.extracted_text.as_deref().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let source_label = selected
            .iter()
            .map(|f| f.file.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let record = CustomCorpusRecord {
            content,
            source_label,
            updated_at: Utc::now(),
        };

        // Persist first; only a successful write mutates anything.
        self.repo.put_custom_corpus(&record).await?;

        {
            let mut state = self.state.write().await;
            state.mode = KnowledgeMode::Custom;
            state.custom = Some(record.clone());
        }
        for file in &selected {
            queue.remove(&file.id).await;
        }

        info!(
            files = selected.len(),
            label = %record.source_label,
            "staged files promoted to custom corpus"
        );
        Ok(record)
    }

    /// Revert to the built-in default corpus, discarding the persisted
    /// custom one.
    pub async fn reset(&self) -> Result<()> {
        self.repo.delete_custom_corpus().await?;
        let mut state = self.state.write().await;
        state.mode = KnowledgeMode::Default;
        state.custom = None;
        info!("knowledge base reset to default corpus");
        Ok(())
    }
}
