use crate::analysis::analyze_markdown;
use crate::config::Config;
use crate::llm::gemini::GeminiClient;
use crate::project::ProjectStore;
use crate::prompts;
use anyhow::{Context, Result};
use std::fs;

use super::spinner;

/// Ask the model for editorial feedback with the full project as context.
pub async fn review_command(config: &Config, project: &str, request: &str) -> Result<()> {
    let store = ProjectStore::open(&config.articles_dir)?;
    let files = store.files(project)?;

    let outline = fs::read_to_string(&files.outline)
        .with_context(|| format!("Failed to read {}", files.outline.display()))?;
    let article = fs::read_to_string(&files.article)
        .with_context(|| format!("Failed to read {}", files.article.display()))?;

    // Profile the article when it has content, otherwise the outline, so the
    // reviewer always sees some style signal.
    let profile = if article.trim().is_empty() {
        analyze_markdown(&outline)
    } else {
        analyze_markdown(&article)
    };

    let generator = GeminiClient::with_config(config.llm.gemini.clone());
    let pb = spinner("Reviewing...");
    let prompt = prompts::review_with_context(request, project, &outline, &article, &profile);
    let feedback = generator.generate(&prompt).await?;
    pb.finish_and_clear();

    println!("{}", feedback);
    Ok(())
}
