//! Article project directories: creation, discovery, and status.
//!
//! Each project lives in its own subdirectory of the articles directory and
//! holds `outline.md`, `article.md`, a `session.json` conversation log, and
//! its own git repository for version history.

pub mod history;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use history::CommitSummary;

pub const OUTLINE_FILE: &str = "outline.md";
pub const ARTICLE_FILE: &str = "article.md";
pub const SESSION_FILE: &str = "session.json";

const OUTLINE_TEMPLATE: &str = "\
# {title} - Outline

## Introduction
- Hook
- Background
- Thesis statement

## Main Points
### Point 1
- Key idea
- Supporting evidence

### Point 2
- Key idea
- Supporting evidence

### Point 3
- Key idea
- Supporting evidence

## Conclusion
- Summary
- Call to action
";

const ARTICLE_TEMPLATE: &str = "\
# {title}

*Generated content will appear here as you expand your outline.*
";

/// Paths to the files of one project.
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    pub outline: PathBuf,
    pub article: PathBuf,
    pub session: PathBuf,
}

/// A project discovered with both draft files present on disk.
#[derive(Debug, Clone)]
pub struct DraftProject {
    pub name: String,
    pub outline_path: PathBuf,
    pub article_path: PathBuf,
}

/// Status summary for one project.
#[derive(Debug)]
pub struct ProjectStatus {
    pub name: String,
    pub path: PathBuf,
    pub outline_size: u64,
    pub article_size: u64,
    pub recent_commits: Vec<CommitSummary>,
}

/// Store of article projects under one articles directory.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    articles_dir: PathBuf,
}

impl ProjectStore {
    /// Open a store, creating the articles directory if needed.
    pub fn open(articles_dir: impl Into<PathBuf>) -> Result<Self> {
        let articles_dir = articles_dir.into();
        fs::create_dir_all(&articles_dir).with_context(|| {
            format!(
                "Failed to create articles directory {}",
                articles_dir.display()
            )
        })?;
        Ok(Self { articles_dir })
    }

    /// Initialize a new project: directory, templated files, git history.
    ///
    /// Fails if the project directory already exists.
    pub fn init_project(&self, name: &str) -> Result<PathBuf> {
        let project_dir = self.articles_dir.join(name);
        if project_dir.exists() {
            anyhow::bail!("Project '{}' already exists", name);
        }

        fs::create_dir_all(&project_dir)
            .with_context(|| format!("Failed to create project directory for '{}'", name))?;

        let title = title_case(name);
        fs::write(
            project_dir.join(OUTLINE_FILE),
            OUTLINE_TEMPLATE.replace("{title}", &title),
        )
        .context("Failed to write outline.md")?;
        fs::write(
            project_dir.join(ARTICLE_FILE),
            ARTICLE_TEMPLATE.replace("{title}", &title),
        )
        .context("Failed to write article.md")?;

        history::init_repo(&project_dir)
            .with_context(|| format!("Failed to initialize version history for '{}'", name))?;

        Ok(project_dir)
    }

    /// Path to a project directory; fails with a named error when absent.
    pub fn project_path(&self, name: &str) -> Result<PathBuf> {
        let project_dir = self.articles_dir.join(name);
        if !project_dir.is_dir() {
            anyhow::bail!("Project '{}' not found", name);
        }
        Ok(project_dir)
    }

    /// File paths for a project.
    pub fn files(&self, name: &str) -> Result<ProjectFiles> {
        let project_dir = self.project_path(name)?;
        Ok(ProjectFiles {
            outline: project_dir.join(OUTLINE_FILE),
            article: project_dir.join(ARTICLE_FILE),
            session: project_dir.join(SESSION_FILE),
        })
    }

    /// Names of all projects, sorted. Hidden directories are skipped.
    pub fn list_projects(&self) -> Result<Vec<String>> {
        let mut projects = Vec::new();

        for entry in fs::read_dir(&self.articles_dir).with_context(|| {
            format!(
                "Failed to read articles directory {}",
                self.articles_dir.display()
            )
        })? {
            let entry = entry.context("Failed to read directory entry")?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            projects.push(name);
        }

        projects.sort();
        Ok(projects)
    }

    /// Projects that have both draft files on disk, ready for ingestion.
    pub fn find_drafts(&self) -> Result<Vec<DraftProject>> {
        let mut drafts = Vec::new();

        for name in self.list_projects()? {
            let project_dir = self.articles_dir.join(&name);
            let outline_path = project_dir.join(OUTLINE_FILE);
            let article_path = project_dir.join(ARTICLE_FILE);
            if outline_path.is_file() && article_path.is_file() {
                drafts.push(DraftProject {
                    name,
                    outline_path,
                    article_path,
                });
            }
        }

        Ok(drafts)
    }

    /// Status summary: file sizes and recent version history.
    pub fn status(&self, name: &str) -> Result<ProjectStatus> {
        let project_dir = self.project_path(name)?;
        let files = self.files(name)?;

        let outline_size = file_size(&files.outline)?;
        let article_size = file_size(&files.article)?;
        let recent_commits = history::recent_commits(&project_dir, 5)
            .with_context(|| format!("Failed to read version history for '{}'", name))?;

        Ok(ProjectStatus {
            name: name.to_string(),
            path: project_dir,
            outline_size,
            article_size,
            recent_commits,
        })
    }
}

fn file_size(path: &Path) -> Result<u64> {
    if !path.exists() {
        return Ok(0);
    }
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    Ok(metadata.len())
}

/// Title-case a project name: underscores become spaces, words capitalize.
pub fn title_case(name: &str) -> String {
    name.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
