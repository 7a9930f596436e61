use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wakectl::cli::Connection;
use wakectl::Result;

#[derive(Parser)]
#[command(name = "wakectl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wake a home server, unlock its disk and watch it boot", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: <config dir>/wakectl/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wake backend URL, overrides the config file
    #[arg(long, global = true, env = "WAKECTL_SERVER_URL")]
    server: Option<String>,

    /// PIN for the wake backend (prompted if missing)
    #[arg(long, global = true, env = "WAKECTL_PIN", hide_env_values = true)]
    pin: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file with the defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Check that the wake backend answers
    Probe,

    /// Poll the host once and show its boot phase
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send Wake-on-LAN and follow the boot (prompts for the passphrase at initrd)
    Wake,

    /// Send the disk passphrase now and follow the boot
    Unlock,

    /// Follow the host without waking it
    Watch,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "wakectl=debug" } else { "wakectl=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: Failed to create tokio runtime: {}", e).red());
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    let connection = Connection {
        config_path: cli.config,
        server: cli.server,
        pin: cli.pin,
    };

    match cli.command {
        Commands::Init { force } => {
            wakectl::cli::init::run(&connection, force)?;
        }

        Commands::Probe => {
            wakectl::cli::probe::run(&connection).await?;
        }

        Commands::Status { json } => {
            wakectl::cli::status::run(&connection, json).await?;
        }

        Commands::Wake => {
            println!("{}", "🚀 Waking server...".cyan());
            wakectl::cli::wake::run(&connection).await?;
        }

        Commands::Unlock => {
            wakectl::cli::unlock::run(&connection).await?;
        }

        Commands::Watch => {
            wakectl::cli::watch::run(&connection).await?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "wakectl", &mut io::stdout());
        }
    }

    Ok(())
}
