//! CLI frontend for the Exusiai gacha simulator and dice roller.

mod commands;

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "exu",
    about = "Exusiai: headhunting simulator and dice roller",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a dice code such as 3d6, 2#1d20+3 or 4d6*2-1 (default: 1d100)
    Roll {
        /// Dice code: [repeats#]throws d sides [*multiplier] [+-bonus]
        code: Option<String>,

        /// What the roll is for; may come before the code
        purpose: Option<String>,

        /// RNG seed for a reproducible roll
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Today's luck of a user, from 0 to 100
    Luck {
        /// User name
        user: String,

        /// Day to ask about, as YYYY-MM-DD (default: today, UTC)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Run headhunting batches on a banner
    Pull {
        /// Banner name (default: the standard banner)
        #[arg(short, long)]
        banner: Option<String>,

        /// Number of batches
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Draws per batch
        #[arg(long, default_value = "10")]
        size: usize,

        /// Guarantee a 5★ or better in every batch
        #[arg(short, long)]
        guarantee: bool,

        /// Share the guaranteed draw between 5★ and 6★ by their base rates
        #[arg(long)]
        proportional: bool,

        /// Fail on an unknown banner instead of using the standard banner
        #[arg(long)]
        strict: bool,

        /// RNG seed for reproducible draws
        #[arg(short, long)]
        seed: Option<u64>,

        /// Catalog JSON file (default: the bundled catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// List the banners in the catalog
    Banners {
        /// Catalog JSON file (default: the bundled catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Show the draw tree of a banner
    Rates {
        /// Banner name (default: the standard banner)
        #[arg(short, long)]
        banner: Option<String>,

        /// Catalog JSON file (default: the bundled catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Roll {
            code,
            purpose,
            seed,
        } => commands::roll::run(code.as_deref(), purpose.as_deref(), seed),
        Commands::Luck { user, date } => commands::luck::run(&user, date),
        Commands::Pull {
            banner,
            count,
            size,
            guarantee,
            proportional,
            strict,
            seed,
            catalog,
        } => commands::pull::run(&commands::pull::PullArgs {
            catalog: catalog.as_deref(),
            banner: banner.as_deref(),
            count,
            size,
            guarantee,
            proportional,
            strict,
            seed,
        }),
        Commands::Banners { catalog } => commands::banners::run(catalog.as_deref()),
        Commands::Rates { banner, catalog } => {
            commands::rates::run(catalog.as_deref(), banner.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
