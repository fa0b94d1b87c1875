use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use parley_agent::{known_commands, DockerChatAgent};
use parley_config::{config_dir, config_file_path, load_and_prepare, ParleyConfig};

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley: recognize commands in model output and act on them")]
#[command(version)]
struct Cli {
    /// Config file to load (defaults to ~/.parley/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one model message and print the agent's reply
    Handle {
        /// The message text
        text: String,
    },
    /// Read messages from stdin, one per blank-line separated chunk
    Repl,
    /// Print the system prompt for the enabled commands
    Instructions,
    /// List the agent's commands and whether each is enabled
    Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let config = load_and_prepare(&path, &known_commands()).await?;

    let logging = config.logging.clone().unwrap_or_default();
    parley_logging::init_logger(logging.dir.as_deref(), logging.level());
    info!(config = %path.display(), "configuration loaded");

    let mut agent = build_agent(&config)?;

    match cli.command {
        Commands::Handle { text } => {
            print_reply(agent.handle(&text)?);
        }
        Commands::Repl => run_repl(&mut agent).await?,
        Commands::Instructions => println!("{}", agent.instructions()),
        Commands::Commands => {
            for (schema, enabled) in agent.command_status() {
                let mark = if enabled { "enabled " } else { "disabled" };
                println!("{mark}  {:<18} {}", schema.name, schema.description);
            }
        }
    }

    Ok(())
}

fn build_agent(config: &ParleyConfig) -> Result<DockerChatAgent> {
    let agent_config = config.agent.clone().unwrap_or_default();
    DockerChatAgent::from_config(&agent_config)
}

fn print_reply(reply: Option<String>) {
    match reply {
        Some(text) => println!("{text}"),
        None => println!("(no response)"),
    }
}

/// Feed stdin to the agent a chunk at a time; a blank line ends a chunk.
async fn run_repl(agent: &mut DockerChatAgent) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut chunk = String::new();

    loop {
        let line = lines.next_line().await?;
        let end_of_chunk = line.as_deref().map_or(true, |l| l.trim().is_empty());
        if let Some(line) = &line {
            if !line.trim().is_empty() {
                chunk.push_str(line);
                chunk.push('\n');
            }
        }

        if end_of_chunk && !chunk.is_empty() {
            match agent.handle(&chunk) {
                Ok(reply) => print_reply(reply),
                Err(err) => error!(error = %err, "message could not be handled"),
            }
            chunk.clear();
        }
        if line.is_none() {
            break;
        }
    }

    Ok(())
}
