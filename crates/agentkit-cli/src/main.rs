mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{agent::AgentSubcommand, catalog::CatalogSubcommand, config::ConfigSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agentkit",
    about = "Compose agents from a catalog of skills, workflows, and commands",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .agentkit/ or .git/)
    #[arg(long, global = true, env = "AGENTKIT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize agentkit in the current project
    Init,

    /// Inspect the capability catalog
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },

    /// Validate, recommend, and manage agent configurations
    Agent {
        #[command(subcommand)]
        subcommand: AgentSubcommand,
    },

    /// Inspect project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved project root");

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Catalog { subcommand } => cmd::catalog::run(&root, subcommand, cli.json),
        Commands::Agent { subcommand } => cmd::agent::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
