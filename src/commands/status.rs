use crate::analysis::analyze_markdown;
use crate::config::Config;
use crate::project::{history, ProjectStore};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;

/// Show project status: paths, file sizes, style profile, recent history.
pub fn status_command(config: &Config, project: &str) -> Result<()> {
    let store = ProjectStore::open(&config.articles_dir)?;
    let status = store.status(project)?;
    let files = store.files(project)?;

    println!("{}", status.name.bold());
    println!("  Path:    {}", status.path.display());
    println!("  Outline: {} bytes", status.outline_size);
    println!("  Article: {} bytes", status.article_size);

    let article = fs::read_to_string(&files.article)
        .with_context(|| format!("Failed to read {}", files.article.display()))?;
    let profile = analyze_markdown(&article);
    if !profile.is_empty() {
        println!("  Style:   {}", profile.style_elements.join(", "));
        if !profile.process_steps.is_empty() {
            println!("  Process: {}", profile.process_steps.join(", "));
        }
    }

    if status.recent_commits.is_empty() {
        println!("  No commits yet");
    } else {
        println!("  Recent commits:");
        for commit in &status.recent_commits {
            println!(
                "    {} {} {}",
                commit.short_hash.yellow(),
                commit.timestamp.format("%Y-%m-%d %H:%M"),
                commit.message
            );
        }
    }

    Ok(())
}

/// List all projects in the articles directory.
///
/// Projects missing either draft file are flagged; they are skipped by
/// tooling that ingests complete drafts.
pub fn list_command(config: &Config) -> Result<()> {
    let store = ProjectStore::open(&config.articles_dir)?;
    let projects = store.list_projects()?;

    if projects.is_empty() {
        println!("No projects yet. Run 'quill init <name>' to create one.");
        return Ok(());
    }

    let drafts = store.find_drafts()?;
    for name in projects {
        if drafts.iter().any(|d| d.name == name) {
            println!("{}", name);
        } else {
            println!("{} {}", name, "(incomplete)".dimmed());
        }
    }
    Ok(())
}

/// Commit the current state of a project with a user-supplied message.
pub fn commit_command(config: &Config, project: &str, message: &str) -> Result<()> {
    let store = ProjectStore::open(&config.articles_dir)?;
    let project_dir = store.project_path(project)?;

    let hash = history::commit_all(&project_dir, message)?;
    println!("✓ Changes committed: {} ({})", message, hash);
    Ok(())
}
