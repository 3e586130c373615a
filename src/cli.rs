use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CommandOverrides;

/// srch - a quick web search interface
#[derive(Parser, Debug)]
#[command(name = "srch")]
#[command(about = "Prompt for a query and a search engine, then open the results")]
#[command(version)]
pub struct Cli {
    /// The menu command to use while prompting for a search query
    #[arg(long, alias = "search_menu", value_name = "CMD", global = true)]
    pub search_menu: Option<String>,

    /// The menu command to use while prompting for a search engine
    #[arg(long, alias = "engine_menu", value_name = "CMD", global = true)]
    pub engine_menu: Option<String>,

    /// The web browser to use
    #[arg(long, value_name = "CMD", global = true)]
    pub browser: Option<String>,

    /// Configuration file (default: $XDG_CONFIG_HOME/srch.json)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Priority cache file (default: $XDG_CACHE_HOME/srch.json)
    #[arg(long, value_name = "PATH", global = true)]
    pub cache: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the engine menu order, one key per line
    Rank,
    /// Print the search URL for a query without opening it
    Url {
        /// Engine key
        engine: String,
        /// Search query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Validate the configuration file
    Validate,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Command overrides for this run.
    pub fn overrides(&self) -> CommandOverrides {
        CommandOverrides {
            search_menu: self.search_menu.clone(),
            engine_menu: self.engine_menu.clone(),
            browser: self.browser.clone(),
        }
    }

    /// Default log filter directive derived from `-v`.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_args() {
        let cli = Cli::try_parse_from(["srch"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.search_menu.is_none());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "srch",
            "--search-menu",
            "rofi -dmenu -p search",
            "--engine-menu",
            "fzf",
            "--browser",
            "firefox",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.search_menu.as_deref(), Some("rofi -dmenu -p search"));
        assert_eq!(overrides.engine_menu.as_deref(), Some("fzf"));
        assert_eq!(overrides.browser.as_deref(), Some("firefox"));
    }

    #[test]
    fn test_cli_underscore_aliases() {
        let cli = Cli::try_parse_from(["srch", "--search_menu", "bemenu", "--engine_menu", "wofi"])
            .unwrap();
        assert_eq!(cli.search_menu.as_deref(), Some("bemenu"));
        assert_eq!(cli.engine_menu.as_deref(), Some("wofi"));
    }

    #[test]
    fn test_cli_url_command() {
        let cli = Cli::try_parse_from(["srch", "url", "g", "funny", "cats"]).unwrap();
        match cli.command {
            Some(Commands::Url { engine, query }) => {
                assert_eq!(engine, "g");
                assert_eq!(query, ["funny", "cats"]);
            }
            other => panic!("Expected Url command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_url_requires_query() {
        assert!(Cli::try_parse_from(["srch", "url", "g"]).is_err());
    }

    #[test]
    fn test_cli_paths_and_verbosity() {
        let cli = Cli::try_parse_from([
            "srch", "rank", "--config", "/tmp/c.json", "--cache", "/tmp/p.json", "-vv",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Rank)));
        assert_eq!(cli.config.as_ref().unwrap().to_str(), Some("/tmp/c.json"));
        assert_eq!(cli.cache.as_ref().unwrap().to_str(), Some("/tmp/p.json"));
        assert_eq!(cli.log_level(), "debug");
    }
}
