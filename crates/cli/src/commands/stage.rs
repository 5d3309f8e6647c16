//! `pblforge stage` — parse local files through the staging queue and
//! print each entry's terminal state; optionally promote the successes
//! into the custom knowledge base.

use anyhow::bail;
use pblforge_config::AppConfig;
use pblforge_ingest::{DefaultParsers, StagedStatus, StagingQueue};
use pblforge_kb::KnowledgeBase;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(config: &AppConfig, files: Vec<PathBuf>, promote: bool) -> anyhow::Result<()> {
    if files.is_empty() {
        bail!("no files given");
    }

    let parsers =
        Arc::new(DefaultParsers::new().with_max_pdf_pages(config.ingest.max_pdf_pages));
    let queue = StagingQueue::new(parsers);

    let uploads = super::read_uploads(&files).await?;
    queue.stage(uploads).await;
    queue.process().await;

    for entry in queue.list().await {
        match entry.status {
            StagedStatus::Success => {
                let chars = entry.extracted_text.as_deref().unwrap_or_default().chars().count();
                println!("ok    {} ({chars} chars)", entry.file.name);
            }
            StagedStatus::Error => {
                println!(
                    "fail  {} — {}",
                    entry.file.name,
                    entry.error_message.as_deref().unwrap_or("unknown error")
                );
            }
            // process() drove everything to a terminal state
            other => println!("{other:?}  {}", entry.file.name),
        }
    }

    if promote {
        let successes: Vec<String> = queue.successes().await.into_iter().map(|e| e.id).collect();
        if successes.is_empty() {
            bail!("nothing parsed successfully; nothing to promote");
        }
        let kb = KnowledgeBase::load(super::open_repository(config)).await?;
        let record = kb.promote(&queue, &successes).await?;
        println!(
            "promoted to custom knowledge base: {} ({} chars)",
            record.source_label,
            record.content.chars().count()
        );
    }

    Ok(())
}
