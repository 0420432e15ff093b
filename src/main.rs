use clap::{Parser, Subcommand};
use quill::commands::chat::chat_command;
use quill::commands::draft::{expand_command, improve_command, rewrite_command};
use quill::commands::init::init_command;
use quill::commands::review::review_command;
use quill::commands::status::{commit_command, list_command, status_command};
use quill::config::{Config, CONFIG_FILE};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Draft articles from outlines with an LLM assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new article project
    Init {
        /// Project name (use underscores for spaces)
        name: String,
    },

    /// List article projects
    List,

    /// Expand outline sections into article prose
    Expand {
        /// Project name
        project: String,

        /// Expand a single section instead of all of them
        #[arg(long)]
        section: Option<String>,
    },

    /// Rewrite an existing article section
    Rewrite {
        /// Project name
        project: String,

        /// Section to rewrite
        section: String,

        /// Steering instruction, e.g. "make it more formal"
        #[arg(long)]
        instruction: Option<String>,
    },

    /// Polish drafted article sections
    Improve {
        /// Project name
        project: String,

        /// Improve a single section instead of all drafted ones
        #[arg(long)]
        section: Option<String>,
    },

    /// Request editorial feedback on the project
    Review {
        /// Project name
        project: String,

        /// What to review
        #[arg(default_value = "review my outline and article")]
        request: String,
    },

    /// Show project status and recent history
    Status {
        /// Project name
        project: String,
    },

    /// Commit the current project state
    Commit {
        /// Project name
        project: String,

        /// Commit message
        message: String,
    },

    /// Start an interactive drafting conversation
    Chat {
        /// Project name
        project: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(Path::new(CONFIG_FILE))?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { name } => init_command(&config, &name),
        Commands::List => list_command(&config),
        Commands::Expand { project, section } => {
            expand_command(&config, &project, section.as_deref()).await
        }
        Commands::Rewrite {
            project,
            section,
            instruction,
        } => rewrite_command(&config, &project, &section, instruction.as_deref()).await,
        Commands::Improve { project, section } => {
            improve_command(&config, &project, section.as_deref()).await
        }
        Commands::Review { project, request } => {
            review_command(&config, &project, &request).await
        }
        Commands::Status { project } => status_command(&config, &project),
        Commands::Commit { project, message } => commit_command(&config, &project, &message),
        Commands::Chat { project } => chat_command(&config, &project).await,
    }
}
