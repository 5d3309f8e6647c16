//! `pblforge evaluate` — run the Mentor over a submission and persist
//! the evaluated submission.

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use pblforge_agents::Mentor;
use pblforge_config::AppConfig;
use pblforge_core::model::Submission;
use std::path::PathBuf;

pub async fn run(
    config: &AppConfig,
    assignment_id: String,
    student: String,
    text: String,
    image: Option<PathBuf>,
) -> anyhow::Result<()> {
    let repo = super::open_repository(config);
    let assignment = repo
        .assignment_by_id(&assignment_id)
        .await?
        .with_context(|| format!("no assignment with id {assignment_id}"))?;

    let image_base64 = match image {
        Some(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("could not read {}", path.display()))?;
            Some(BASE64.encode(bytes))
        }
        None => None,
    };

    let mentor = Mentor::new(super::backend(config)?)
        .with_temperature(config.agents.evaluation_temperature);
    let evaluation = mentor
        .evaluate(&assignment.content, &text, image_base64.as_deref())
        .await?;

    let mut submission = Submission::new(assignment.id.clone(), student, text, image_base64);
    submission.ai_evaluation = Some(evaluation.clone());
    repo.save_submission(&submission).await?;

    println!("submission {} evaluated", submission.id);
    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}
