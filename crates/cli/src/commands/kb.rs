//! `pblforge kb` — show which corpus is active, or reset to the
//! built-in default.

use pblforge_config::AppConfig;
use pblforge_kb::{KnowledgeBase, KnowledgeMode};

pub async fn run(config: &AppConfig, reset: bool) -> anyhow::Result<()> {
    let kb = KnowledgeBase::load(super::open_repository(config)).await?;

    if reset {
        kb.reset().await?;
        println!("custom knowledge base discarded; using built-in default");
        return Ok(());
    }

    match kb.mode().await {
        KnowledgeMode::Default => println!("active corpus: built-in default"),
        KnowledgeMode::Custom => {
            // mode is Custom only when a record is present
            if let Some(record) = kb.custom_record().await {
                println!(
                    "active corpus: custom — {} ({} chars, updated {})",
                    record.source_label,
                    record.content.chars().count(),
                    record.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }
    Ok(())
}
