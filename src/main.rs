//! srch - main entry point

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use srch::cli::{Cli, Commands};
use srch::process_guard;
use srch::{CommandBrowser, CommandMenu, Launcher, Outcome, PriorityStore, SearchConfig, Settings};

/// Initialize logging on stderr; stdout belongs to `rank` and `url`.
fn init_logger(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.log_level());

    if let Err(e) = process_guard::init_signal_handlers() {
        warn!("Failed to initialize signal handlers: {}", e);
    }

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => SearchConfig::default_path()?,
    };
    debug!("Using configuration {:?}", config_path);

    let config = match SearchConfig::load_from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            if matches!(cli.command, Some(Commands::Validate)) {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }
            error!("{}", e);
            return Err(e).context("could not load configuration");
        }
    };

    let warnings = config.warnings();
    let engine_count = config.bangs.len();
    if !matches!(cli.command, Some(Commands::Validate)) {
        for warning in &warnings {
            warn!("{}", warning);
        }
    }

    let settings = Settings::resolve(config, &cli.overrides());
    let cache_path = match &cli.cache {
        Some(path) => path.clone(),
        None => PriorityStore::default_path()?,
    };
    let store = PriorityStore::new(cache_path);
    let launcher = Launcher::new(&settings, &store);

    match &cli.command {
        Some(Commands::Rank) => {
            let (_, order) = launcher.ranked_engines()?;
            for key in order {
                println!("{}", key);
            }
        }
        Some(Commands::Url { engine, query }) => {
            println!("{}", launcher.preview_url(engine, &query.join(" "))?);
        }
        Some(Commands::Validate) => {
            for warning in &warnings {
                println!("! {}", warning);
            }
            println!(
                "✓ Configuration file is valid: {} engine(s) in {:?}",
                engine_count, config_path
            );
        }
        None => {
            let query_menu = CommandMenu::new(settings.search_menu.clone());
            let engine_menu = CommandMenu::new(settings.engine_menu.clone());
            let browser = CommandBrowser::new(settings.browser.clone());

            match launcher.run(&query_menu, &engine_menu, &browser)? {
                Outcome::Opened { engine, .. } => info!("Searched with {:?}", engine),
                Outcome::Aborted(reason) => info!("Nothing to search: {:?}", reason),
            }
        }
    }

    Ok(())
}
