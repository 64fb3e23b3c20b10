// Arcs draft command-line front end.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file, stdout is for results)
// 3. Load config, copying defaults on first run
// 4. Load the tier list, for commands that draw cards
// 5. Run the requested command

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use arcs_draft_core::config;
use arcs_draft_core::draft::order::DraftOrderPolicy;

#[derive(Parser)]
#[command(
    name = "arcs-draft",
    about = "Leader and lore draft helper for Arcs",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base directory holding config/, defaults/ and data/
    #[arg(short, long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Build the tier list from a name,category,win_rate CSV instead of the
    /// configured tier list
    #[arg(long, global = true)]
    win_rates: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the scored tier list
    Tiers,

    /// Print the base turn order
    Order {
        /// Number of players (default: from config)
        #[arg(short, long)]
        players: Option<usize>,

        /// Turn order (default: from config)
        #[arg(long, value_enum)]
        policy: Option<OrderArg>,
    },

    /// Draw a random pool and auto-draft it with the recommendation engine
    Auto {
        /// RNG seed for a reproducible pool
        #[arg(short, long)]
        seed: Option<u64>,

        /// Turn order (default: from config)
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
    },

    /// Search for the pool and assignment with the smallest score spread
    Balance {
        /// RNG seed for reproducible sampling
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Auto-draft many random pools under both turn orders
    Simulate {
        /// Completed drafts per turn order
        #[arg(short, long, default_value = "1000")]
        runs: usize,

        /// Write every player's result to this CSV file
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// RNG seed for reproducible pools
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

/// `--policy` / `--order` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    /// N..1 every round
    Descending,
    /// N..1 then 1..N
    Snake,
}

impl From<OrderArg> for DraftOrderPolicy {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Descending => DraftOrderPolicy::Descending,
            OrderArg::Snake => DraftOrderPolicy::Snake,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.dir)?;
    info!("arcs-draft starting up");

    config::ensure_config_files(&cli.dir).context("failed to prepare config files")?;
    let config = config::load_config_from(&cli.dir).context("failed to load configuration")?;
    info!(
        "Config loaded: {} players, {} lore each, {} scoring",
        config.draft.num_players,
        config.draft.lore_per_player,
        config.draft.tier_scoring.label()
    );

    let tier_list = || commands::load_tier_list(&cli.dir, &config, cli.win_rates.as_deref());

    match cli.command {
        Commands::Tiers => commands::tiers(&tier_list()?),
        Commands::Order { players, policy } => {
            commands::order(&config, players, policy.map(Into::into))
        }
        Commands::Auto { seed, order } => {
            commands::auto(&config, &tier_list()?, seed, order.map(Into::into))
        }
        Commands::Balance { seed, json } => commands::balance(&config, &tier_list()?, seed, json),
        Commands::Simulate { runs, ref out, seed } => {
            commands::simulate(&config, &tier_list()?, runs, out.as_deref(), seed)
        }
    }
}

/// Initialize tracing to log to a file under `<base>/logs`.
fn init_tracing(base_dir: &std::path::Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("arcs-draft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("arcs_draft=info,arcs_draft_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
