//! Interactive drafting conversation.
//!
//! Reads user turns from stdin, routes each through the chat workflow, and
//! saves the session after every turn so an interrupted conversation resumes
//! from its last checkpoint.

use crate::chat::{ChatAction, ChatWorkflow};
use crate::config::Config;
use crate::llm::gemini::GeminiClient;
use crate::project::ProjectStore;
use crate::session::Session;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};

pub async fn chat_command(config: &Config, project: &str) -> Result<()> {
    let store = ProjectStore::open(&config.articles_dir)?;
    let files = store.files(project)?;

    let mut session = Session::load_or_new(&files.session, project)
        .context("Failed to load session")?;
    let generator = GeminiClient::with_config(config.llm.gemini.clone());
    let workflow = ChatWorkflow::new(&generator);

    println!(
        "Chat started for '{}'. Type 'exit' to leave.",
        project
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", "You:".bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break; // EOF
        };
        let input = line.context("Failed to read input")?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("Goodbye!");
            break;
        }

        let turn = workflow.run_turn(&mut session, input).await?;
        session.save(&files.session).context("Failed to save session")?;

        if turn.action == ChatAction::End {
            println!("Goodbye!");
            break;
        }

        println!("{} {}", "Assistant:".bold(), turn.response);
    }

    session.save(&files.session).context("Failed to save session")?;
    Ok(())
}
