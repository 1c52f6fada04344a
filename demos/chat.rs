//! Interactive chat REPL for the persona agent.
//!
//! Usage:
//!   cargo run --example chat
//!   cargo run --example chat -- --base-dir ~/.persona --window 50
//!   cargo run --example chat -- --recall 4 --sequence-ids
//!
//! Commands: "/recent" prints the recent window, "/recall <query>" searches
//! memory, "/plan <objective>" splits an objective into steps.
//! Ctrl-D or type "exit" / "quit" to leave.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use persona_agent::{AgentConfig, ConversationEngine, GoalPlanner, IdentityScheme};

#[derive(Parser)]
#[command(name = "chat", about = "Chat with a persona agent")]
struct Cli {
    /// Directory holding personalities/wednesday.json
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Recent-window capacity
    #[arg(long, default_value_t = 30)]
    window: usize,

    /// Related memories recalled per reply
    #[arg(long, default_value_t = 2)]
    recall: usize,

    /// Embedding dimension
    #[arg(long, default_value_t = 64)]
    dim: usize,

    /// Derive record ids from a counter instead of the store size
    #[arg(long)]
    sequence_ids: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = AgentConfig::rooted_at(&cli.base_dir);
    config.memory = config
        .memory
        .with_session_window(cli.window)
        .with_embedding_dim(cli.dim);
    if cli.sequence_ids {
        config.memory = config.memory.with_identity(IdentityScheme::Sequence);
    }
    config.recall_limit = cli.recall;

    let engine = match ConversationEngine::from_config(config).await {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    eprintln!("persona-agent chat");
    eprintln!("persona: {}", engine.profile().name);
    eprintln!("window: {} | recall: {}", cli.window, cli.recall);
    eprintln!("---");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        eprint!("\x1b[1;36myou>\x1b[0m ");
        io::stderr().flush().ok();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed, "exit" | "quit" | "/q") {
            break;
        }

        if trimmed == "/recent" {
            for record in engine.memory().recent().await {
                eprintln!("\x1b[2m  [{} {}] {}\x1b[0m", record.kind, record.id, record.text);
            }
            continue;
        }

        if let Some(query) = trimmed.strip_prefix("/recall ") {
            match engine.memory().recall(query, cli.recall.max(1)).await {
                Ok(records) if records.is_empty() => eprintln!("\x1b[2m  (nothing)\x1b[0m"),
                Ok(records) => {
                    for record in records {
                        eprintln!("\x1b[33m  [{}]\x1b[0m {}", record.kind, record.text);
                    }
                }
                Err(e) => eprintln!("\x1b[1;31merror:\x1b[0m {e}"),
            }
            continue;
        }

        if let Some(objective) = trimmed.strip_prefix("/plan ") {
            for step in GoalPlanner.plan(objective) {
                eprintln!("\x1b[35m  {}.\x1b[0m {}", step.id, step.description);
            }
            continue;
        }

        match engine.reply(trimmed).await {
            Ok(response) => {
                eprint!("\x1b[1;32magent>\x1b[0m ");
                println!("{response}");
            }
            Err(e) => eprintln!("\x1b[1;31merror:\x1b[0m {e}"),
        }
    }

    eprintln!("bye.");
}
