use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use env_logger::{Env, Target};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use steam_api::{LoadOptions, SteamClient, parse_family_ids};
use steam_tui::Library;
use steam_tui::artwork::{DEFAULT_MAX_ENTRIES, default_cache_dir};
use steam_tui::tui::{self, AppConfig};

const LOG_FILE: &str = "steam-tui.log";

#[derive(Parser)]
#[command(name = "steam-tui")]
#[command(about = "Browse your Steam library by genre, with family ownership", long_about = None)]
#[command(version)]
struct Cli {
    /// Steam Web API key
    #[arg(long, env = "STEAM_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Your 64-bit Steam ID
    #[arg(long, env = "STEAM_ID")]
    steam_id: String,

    /// Comma-separated family member IDs, used when the family group cannot be read
    #[arg(long, env = "FAMILY_STEAM_IDS", default_value = "")]
    family_ids: String,

    /// Artwork cache and log directory
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Maximum number of cached artwork images
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES)]
    cache_max_entries: usize,

    /// Do not fetch or render artwork
    #[arg(long)]
    no_artwork: bool,

    /// Look up genres in the store API (one request per game)
    #[arg(long)]
    genres: bool,

    #[arg(short = 'd', long = "debug", hide = true)]
    debug: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    steam_ui::init_color();
    anyhow::ensure!(!cli.api_key.trim().is_empty(), "Steam API key is empty");
    anyhow::ensure!(!cli.steam_id.trim().is_empty(), "Steam ID is empty");

    let cache_dir = cli
        .cache_dir
        .clone()
        .or_else(default_cache_dir)
        .context("Could not determine a cache directory; pass --cache-dir")?;
    init_logging(&cache_dir, cli.debug);

    let client = SteamClient::new(&cli.api_key, &cli.steam_id)?;
    let options = LoadOptions {
        fallback_family_ids: parse_family_ids(&cli.family_ids),
        enrich_genres: cli.genres,
    };
    let data = client.load_library(&options, |msg| eprintln!("{}", msg.dimmed()));
    let library = Library::from(data);
    log::info!(
        "{} games in {} genres, {} family members",
        library.games.len(),
        library.tree.len(),
        library.family.len()
    );

    tui::run(
        library,
        AppConfig {
            cache_dir,
            cache_max_entries: cli.cache_max_entries,
            artwork: !cli.no_artwork,
        },
    )
}

/// The UI owns the terminal, so log records go to a file in the cache directory
fn init_logging(cache_dir: &Path, debug: bool) {
    let env = if debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };

    let file = fs::create_dir_all(cache_dir).and_then(|()| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(cache_dir.join(LOG_FILE))
    });
    match file {
        Ok(file) => {
            env_logger::Builder::from_env(env)
                .target(Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!(
            "{} cannot open log file in {}: {e}",
            "Warning:".yellow(),
            cache_dir.display()
        ),
    }
}
