//! Version history for project directories, backed by git.
//!
//! Thin wrapper over git2: initialize a repository with an initial commit,
//! stage-and-commit the whole working tree, and read recent commit summaries
//! for the status display. Projects without a configured git identity fall
//! back to a built-in signature.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use git2::{IndexAddOption, Repository, Signature, Sort};
use std::path::Path;

const FALLBACK_NAME: &str = "quill";
const FALLBACK_EMAIL: &str = "quill@localhost";

/// Summary of one commit for status output.
#[derive(Debug, Clone)]
pub struct CommitSummary {
    /// Short hash (8 characters)
    pub short_hash: String,
    /// First line of the commit message
    pub message: String,
    /// Commit time
    pub timestamp: DateTime<Utc>,
}

/// Initialize a git repository in the project directory and commit the
/// initial files.
pub fn init_repo(project_dir: &Path) -> Result<()> {
    Repository::init(project_dir).with_context(|| {
        format!("Failed to initialize repository at {}", project_dir.display())
    })?;
    commit_all(project_dir, "Initial project setup")?;
    Ok(())
}

/// Stage all changes in the project directory and commit them.
///
/// Returns the short hash of the new commit.
pub fn commit_all(project_dir: &Path, message: &str) -> Result<String> {
    let repo = Repository::open(project_dir).with_context(|| {
        format!("Failed to open repository at {}", project_dir.display())
    })?;

    let mut index = repo.index().context("Failed to read index")?;
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .context("Failed to stage changes")?;
    index.write().context("Failed to write index")?;

    let tree_id = index.write_tree().context("Failed to write tree")?;
    let tree = repo.find_tree(tree_id).context("Failed to find tree")?;

    let signature = repo
        .signature()
        .or_else(|_| Signature::now(FALLBACK_NAME, FALLBACK_EMAIL))
        .context("Failed to create signature")?;

    // First commit on an unborn branch has no parent.
    let parent = match repo.head() {
        Ok(head) => {
            let oid = head
                .target()
                .context("HEAD does not point to a commit")?;
            Some(repo.find_commit(oid).context("Failed to find HEAD commit")?)
        }
        Err(_) => None,
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let oid = repo
        .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .context("Failed to create commit")?;

    Ok(oid.to_string()[..8].to_string())
}

/// Read the most recent commits, newest first.
///
/// An unborn branch (no commits yet) yields an empty vector.
pub fn recent_commits(project_dir: &Path, limit: usize) -> Result<Vec<CommitSummary>> {
    let repo = Repository::open(project_dir).with_context(|| {
        format!("Failed to open repository at {}", project_dir.display())
    })?;

    if repo.head().is_err() {
        return Ok(Vec::new());
    }

    let mut revwalk = repo.revwalk().context("Failed to create revision walker")?;
    revwalk
        .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
        .context("Failed to set revwalk sorting")?;
    revwalk.push_head().context("Failed to push HEAD to revwalk")?;

    let mut commits = Vec::new();
    for oid_result in revwalk.take(limit) {
        let oid = oid_result.context("Failed to get commit OID")?;
        let commit = repo
            .find_commit(oid)
            .with_context(|| format!("Failed to find commit {}", oid))?;

        let timestamp = DateTime::<Utc>::from_timestamp(commit.time().seconds(), 0)
            .unwrap_or_default();

        commits.push(CommitSummary {
            short_hash: oid.to_string()[..8].to_string(),
            message: commit.summary().unwrap_or("").to_string(),
            timestamp,
        });
    }

    Ok(commits)
}
