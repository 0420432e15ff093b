//! Draft commands: expand outline sections into prose, rewrite a section,
//! improve existing sections.
//!
//! All three follow the same shape: read the project files, compute the new
//! article text fully in memory, write the file once, then commit. The
//! read-transform-write sequence is a single critical section; nothing here
//! guards against a concurrent writer on the same project.

use crate::config::Config;
use crate::llm::gemini::GeminiClient;
use crate::llm::ContentGenerator;
use crate::project::{history, ProjectStore};
use crate::prompts;
use crate::section::{find_section, parse_outline_sections, update_section, OutlineSection};
use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use super::spinner;

/// Expand one outline section (or all of them) into article prose.
pub async fn expand_command(config: &Config, project: &str, section: Option<&str>) -> Result<()> {
    let store = ProjectStore::open(&config.articles_dir)?;
    let files = store.files(project)?;

    let outline = fs::read_to_string(&files.outline)
        .with_context(|| format!("Failed to read {}", files.outline.display()))?;
    let article = fs::read_to_string(&files.article)
        .with_context(|| format!("Failed to read {}", files.article.display()))?;

    let generator = GeminiClient::with_config(config.llm.gemini.clone());
    let (updated, names) = expand_into_article(&generator, &outline, &article, section).await?;

    fs::write(&files.article, &updated)
        .with_context(|| format!("Failed to write {}", files.article.display()))?;

    let message = commit_message("Expand", &names);
    let hash = history::commit_all(&store.project_path(project)?, &message)?;
    info!("Committed '{}' as {}", message, hash);
    println!("✓ {} ({})", message, hash);

    Ok(())
}

/// Expand the selected outline sections into the article text.
///
/// Returns the updated article and the section names written, in outline
/// order. The article is only a value here; writing it back is the caller's
/// all-or-nothing step.
async fn expand_into_article(
    generator: &dyn ContentGenerator,
    outline: &str,
    article: &str,
    target: Option<&str>,
) -> Result<(String, Vec<String>)> {
    let sections = parse_outline_sections(outline);
    if sections.is_empty() {
        anyhow::bail!("No sections found in outline.md. Add '### ' headings first.");
    }
    let targets = select_targets(&sections, target)?;

    let mut updated = article.to_string();
    let mut names = Vec::new();

    for section in targets {
        let pb = spinner(&format!("Expanding '{}'...", section.name));
        let prompt = prompts::expand_section(&section.name, &section.content, outline);
        let text = generator.generate(&prompt).await?;
        updated = update_section(&updated, &section.name, &text);
        pb.finish_with_message(format!("Expanded '{}'", section.name));
        names.push(section.name.clone());
    }

    Ok((updated, names))
}

/// Rewrite an existing article section, optionally steered by an instruction.
pub async fn rewrite_command(
    config: &Config,
    project: &str,
    section: &str,
    instruction: Option<&str>,
) -> Result<()> {
    let store = ProjectStore::open(&config.articles_dir)?;
    let files = store.files(project)?;

    let article = fs::read_to_string(&files.article)
        .with_context(|| format!("Failed to read {}", files.article.display()))?;

    let current = find_section(&article, section)
        .ok_or_else(|| anyhow::anyhow!("Section '{}' not found in article.md", section))?;

    let generator = GeminiClient::with_config(config.llm.gemini.clone());
    let pb = spinner(&format!("Rewriting '{}'...", section));
    let prompt = prompts::rewrite_section(section, &current, instruction.unwrap_or(""));
    let text = generator.generate(&prompt).await?;
    let updated = update_section(&article, section, &text);
    pb.finish_with_message(format!("Rewrote '{}'", section));

    fs::write(&files.article, &updated)
        .with_context(|| format!("Failed to write {}", files.article.display()))?;

    let message = format!("Rewrite section: {}", section);
    let hash = history::commit_all(&store.project_path(project)?, &message)?;
    println!("✓ {} ({})", message, hash);

    Ok(())
}

/// Polish one article section, or every outline section already drafted.
pub async fn improve_command(config: &Config, project: &str, section: Option<&str>) -> Result<()> {
    let store = ProjectStore::open(&config.articles_dir)?;
    let files = store.files(project)?;

    let outline = fs::read_to_string(&files.outline)
        .with_context(|| format!("Failed to read {}", files.outline.display()))?;
    let article = fs::read_to_string(&files.article)
        .with_context(|| format!("Failed to read {}", files.article.display()))?;

    let generator = GeminiClient::with_config(config.llm.gemini.clone());
    let (updated, improved) =
        improve_article(&generator, &outline, &article, section).await?;

    if improved.is_empty() {
        println!("Nothing to improve: no drafted sections found in article.md");
        return Ok(());
    }

    fs::write(&files.article, &updated)
        .with_context(|| format!("Failed to write {}", files.article.display()))?;

    let message = commit_message("Improve", &improved);
    let hash = history::commit_all(&store.project_path(project)?, &message)?;
    println!("✓ {} ({})", message, hash);

    Ok(())
}

/// Improve the drafted sections of the article text.
///
/// With a named target the section must exist in the article; without one,
/// outline sections missing from the article are skipped quietly.
async fn improve_article(
    generator: &dyn ContentGenerator,
    outline: &str,
    article: &str,
    target: Option<&str>,
) -> Result<(String, Vec<String>)> {
    let names: Vec<String> = match target {
        Some(name) => vec![name.to_string()],
        None => parse_outline_sections(outline)
            .into_iter()
            .map(|s| s.name)
            .collect(),
    };

    let mut updated = article.to_string();
    let mut improved = Vec::new();

    for name in names {
        let Some(current) = find_section(&updated, &name) else {
            if target.is_some() {
                anyhow::bail!("Section '{}' not found in article.md", name);
            }
            continue;
        };
        if current.is_empty() {
            continue;
        }

        let pb = spinner(&format!("Improving '{}'...", name));
        let prompt = prompts::improve_section(&name, &current);
        let text = generator.generate(&prompt).await?;
        updated = update_section(&updated, &name, &text);
        pb.finish_with_message(format!("Improved '{}'", name));
        improved.push(name);
    }

    Ok((updated, improved))
}

/// Pick the outline sections a draft command should touch.
///
/// A named target matches the first outline section with that name
/// (case-insensitive); no target means all sections, in outline order.
fn select_targets<'a>(
    sections: &'a [OutlineSection],
    target: Option<&str>,
) -> Result<Vec<&'a OutlineSection>> {
    match target {
        None => Ok(sections.iter().collect()),
        Some(name) => {
            let found = sections
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow::anyhow!("Section '{}' not found in outline.md", name))?;
            Ok(vec![found])
        }
    }
}

/// Commit message for a batch of section updates.
fn commit_message(verb: &str, names: &[String]) -> String {
    match names {
        [single] => format!("{} section: {}", verb, single),
        _ => format!("{} {} sections", verb, names.len()),
    }
}
