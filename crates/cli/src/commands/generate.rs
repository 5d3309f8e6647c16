//! `pblforge generate` — build the active corpus (plus any ad-hoc
//! files for this call), run the Architect, and persist the assignment.

use pblforge_agents::Architect;
use pblforge_config::AppConfig;
use pblforge_core::model::{Assignment, Difficulty};
use pblforge_ingest::{DefaultParsers, StagingQueue};
use pblforge_kb::KnowledgeBase;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(
    config: &AppConfig,
    topic: String,
    subjects: Vec<String>,
    difficulty: Difficulty,
    with_files: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let repo = super::open_repository(config);
    let kb = KnowledgeBase::load(repo.clone()).await?;

    // Ad-hoc uploads are merged into this call's corpus without
    // requiring promotion.
    let parsers =
        Arc::new(DefaultParsers::new().with_max_pdf_pages(config.ingest.max_pdf_pages));
    let queue = StagingQueue::new(parsers);
    if !with_files.is_empty() {
        queue.stage(super::read_uploads(&with_files).await?).await;
        queue.process().await;
    }
    let corpus = kb.active_corpus(&queue.list().await).await;

    let architect = Architect::new(super::backend(config)?)
        .with_temperature(config.agents.generation_temperature);
    let content = architect
        .generate(&topic, &subjects, difficulty, &corpus)
        .await?;

    let assignment = Assignment::new(topic, subjects, difficulty, content);
    repo.save_assignment(&assignment).await?;

    println!("assignment {} saved", assignment.id);
    println!("{}", serde_json::to_string_pretty(&assignment.content)?);
    Ok(())
}
