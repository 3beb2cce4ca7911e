mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{build::BuildArgs, config::ConfigSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ocm-env",
    about = "Build a local Open Cluster Management environment on kind: one hub plus joined managed clusters",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding ocm-env.yaml (default: auto-detect upward from cwd)
    #[arg(long, global = true, env = "OCM_ENV_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that kubectl, clusteradm, and kind are installed
    Verify,

    /// Show the clusteradm client and server versions
    Version,

    /// Create the kind clusters, initialize the hub, and join the managed clusters
    Build(BuildArgs),

    /// Manage ocm-env.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Build(_) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Verify => cmd::verify::run(cli.json),
        Commands::Version => cmd::version::run(cli.json),
        Commands::Build(args) => cmd::build::run(&root, args, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
