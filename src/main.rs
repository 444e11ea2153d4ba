//! frontdesk CLI: receptionist knowledge and escalation engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use frontdesk::config::FrontdeskConfig;
use frontdesk::engine::{Engine, EngineConfig, Resolution};
use frontdesk::model::RequestStatus;
use frontdesk::paths::FrontdeskPaths;

#[derive(Parser)]
#[command(
    name = "frontdesk",
    version,
    about = "Receptionist knowledge and escalation engine"
)]
struct Cli {
    /// Data directory for persistent storage (default: XDG data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database.
    Init,

    /// Resolve a caller question: answer from the knowledge base or escalate.
    Ask {
        /// The caller's question, reformulated as clean text.
        question: String,

        /// Caller identity the escalation is bound to.
        #[arg(long, default_value = "console")]
        customer: String,

        /// Simulate a front-end misfire (no verified user speech).
        #[arg(long)]
        unconfirmed: bool,
    },

    /// Manage escalated help requests.
    Requests {
        #[command(subcommand)]
        action: RequestAction,
    },

    /// Manage knowledge base entries.
    Kb {
        #[command(subcommand)]
        action: KbAction,
    },

    /// Show store counts.
    Info,
}

#[derive(Subcommand)]
enum RequestAction {
    /// List help requests as JSON.
    List {
        /// "Pending" or "Resolved".
        #[arg(long, default_value = "Pending")]
        status: RequestStatus,
    },
    /// Submit a supervisor answer for a pending request.
    Resolve {
        /// Help request id.
        id: String,
        /// The supervisor's free-text answer.
        answer: String,
    },
}

#[derive(Subcommand)]
enum KbAction {
    /// List all knowledge entries as JSON.
    List,
    /// Add a question→answer entry directly.
    Add {
        question: String,
        answer: String,
    },
    /// Delete an entry by id (idempotent).
    Delete {
        id: String,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let paths = FrontdeskPaths::resolve()?;
    let file_config = FrontdeskConfig::load(&paths.config_file())?;
    let config = EngineConfig {
        data_dir: cli
            .data_dir
            .clone()
            .or_else(|| file_config.data_dir.clone())
            .or(Some(paths.data_dir.clone())),
        ..file_config.engine_config(None)
    };

    match cli.command {
        Commands::Init => {
            paths.ensure_dirs()?;
            let engine = Engine::new(config.clone())?;
            if let Some(data_dir) = &config.data_dir {
                println!("Initialized frontdesk at {}", data_dir.display());
            }
            print_stats(&engine)?;
        }

        Commands::Ask {
            question,
            customer,
            unconfirmed,
        } => {
            let engine = Engine::new(config)?;
            match engine.resolve_question(&customer, &question, !unconfirmed)? {
                Resolution::Answered { answer, .. } => {
                    println!("{answer}");
                }
                Resolution::Escalated { request_id } => {
                    println!("Let me check with my supervisor and get back to you.");
                    println!("Escalated to supervisor (request {request_id}).");
                }
                Resolution::Rejected { .. } => {
                    // Intentionally quiet: a front-end misfire is logged by
                    // the engine and never surfaced to the caller.
                }
                Resolution::ClarificationNeeded => {
                    println!("I'm sorry, I didn't catch that. Could you repeat?");
                }
            }
        }

        Commands::Requests { action } => match action {
            RequestAction::List { status } => {
                let engine = Engine::new(config)?;
                let requests = engine.list_escalations(status)?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&requests).into_diagnostic()?
                );
            }
            RequestAction::Resolve { id, answer } => {
                let engine = Engine::new(config)?;
                let resolved = engine.resolve_escalation(&id, &answer)?;
                println!(
                    "Resolved request {} for {}: {}",
                    resolved.id, resolved.customer_id, answer
                );
            }
        },

        Commands::Kb { action } => match action {
            KbAction::List => {
                let engine = Engine::new(config)?;
                let entries = engine.list_knowledge()?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&entries).into_diagnostic()?
                );
            }
            KbAction::Add { question, answer } => {
                let engine = Engine::new(config)?;
                let entry = engine.add_knowledge(&question, &answer)?;
                println!("Added knowledge entry {}", entry.id);
            }
            KbAction::Delete { id } => {
                let engine = Engine::new(config)?;
                if engine.delete_knowledge(&id)? {
                    println!("Deleted knowledge entry {id}");
                } else {
                    println!("No knowledge entry {id} (already gone)");
                }
            }
        },

        Commands::Info => {
            let engine = Engine::new(config)?;
            print_stats(&engine)?;
        }
    }

    Ok(())
}

fn print_stats(engine: &Engine) -> Result<()> {
    let stats = engine.stats()?;
    println!(
        "knowledge entries: {}\npending requests: {}\nresolved requests: {}",
        stats.knowledge_entries, stats.pending_requests, stats.resolved_requests
    );
    Ok(())
}
