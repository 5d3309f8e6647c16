//! `pblforge hint` — ask the Tutor for a nudge on a draft answer.

use anyhow::Context;
use pblforge_agents::Tutor;
use pblforge_config::AppConfig;

pub async fn run(config: &AppConfig, assignment_id: String, draft: String) -> anyhow::Result<()> {
    let repo = super::open_repository(config);
    let assignment = repo
        .assignment_by_id(&assignment_id)
        .await?
        .with_context(|| format!("no assignment with id {assignment_id}"))?;

    let tutor = Tutor::new(super::backend(config)?);
    let hint = tutor.hint(&assignment.content, &draft).await;
    println!("{hint}");
    Ok(())
}
