//! Configuration file handling and per-run settings.
//!
//! The configuration file is read once at startup. Command-line overrides are
//! folded in by [`Settings::resolve`], and the resulting `Settings` is never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SrchError};

/// File name used for both the configuration and the priority cache.
pub const FILE_NAME: &str = "srch.json";

pub const DEFAULT_SEARCH_MENU: &str = "dmenu -p search";
pub const DEFAULT_ENGINE_MENU: &str = "dmenu -p engine -i";
pub const DEFAULT_BROWSER: &str = "xdg-open";
pub const DEFAULT_ADDRESS: &str = "https://www.duckduckgo.com/";

/// Engine key → query template (e.g. `"g" → "!g"`).
pub type Bangs = BTreeMap<String, String>;

/// An external program invocation: program plus argument vector.
///
/// Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Split a command string on whitespace. Returns `None` for a blank string.
    pub fn parse(line: &str) -> Option<Self> {
        Self::from_argv(line.split_whitespace().map(str::to_string).collect())
    }

    /// Build from an explicit argv. Returns `None` if the program is missing.
    pub fn from_argv(mut argv: Vec<String>) -> Option<Self> {
        if argv.first().is_none_or(|p| p.trim().is_empty()) {
            return None;
        }
        let program = argv.remove(0);
        Some(Self {
            program,
            args: argv,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// A `std::process::Command` with program and arguments filled in.
    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How a command may be written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSource {
    /// `"dmenu -p search"`
    Line(String),
    /// `["rofi", "-dmenu", "-p", "search"]`
    Argv(Vec<String>),
}

impl CommandSource {
    pub fn into_command(self) -> Option<CommandLine> {
        match self {
            CommandSource::Line(line) => CommandLine::parse(&line),
            CommandSource::Argv(argv) => CommandLine::from_argv(argv),
        }
    }
}

/// The on-disk configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub bangs: Bangs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_menu: Option<CommandSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_menu: Option<CommandSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<CommandSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SearchConfig {
    /// `$XDG_CONFIG_HOME/srch.json` (or the platform equivalent).
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(FILE_NAME))
            .ok_or(SrchError::NoConfigDir)
    }

    /// Load configuration from a JSON file.
    ///
    /// Every failure here is fatal: a missing file, invalid JSON, or a
    /// document without `bangs` all become `SrchError::Config`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SrchError::config(format!("Failed to read configuration from {:?}: {}", path, e))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            SrchError::config(format!("Failed to parse configuration {:?}: {}", path, e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.bangs.is_empty() {
            return Err(SrchError::config("\"bangs\" must contain at least one engine"));
        }

        // Keys travel to the engine menu one per line.
        for key in self.bangs.keys() {
            if key.trim().is_empty() {
                return Err(SrchError::config("engine keys must not be blank"));
            }
            if key.contains(['\n', '\r']) {
                return Err(SrchError::config(format!(
                    "engine key {:?} must not contain a line break",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Non-fatal problems worth telling the user about.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        match self.default.as_deref() {
            None | Some("") => {
                warnings.push("no \"default\" engine configured; no engine is pinned first".into())
            }
            Some(key) if !self.bangs.contains_key(key) => warnings.push(format!(
                "default engine {:?} is not one of the configured bangs",
                key
            )),
            Some(_) => {}
        }
        warnings
    }
}

/// Per-run command overrides from the command line.
#[derive(Debug, Clone, Default)]
pub struct CommandOverrides {
    pub search_menu: Option<String>,
    pub engine_menu: Option<String>,
    pub browser: Option<String>,
}

/// Fully resolved, immutable settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bangs: Bangs,
    pub default: Option<String>,
    pub search_menu: CommandLine,
    pub engine_menu: CommandLine,
    pub browser: CommandLine,
    pub address: String,
}

impl Settings {
    /// Resolve settings with precedence: command line, then file, then built-in default.
    pub fn resolve(config: SearchConfig, overrides: &CommandOverrides) -> Self {
        let pick = |cli: &Option<String>, file: Option<CommandSource>, fallback: &str| {
            cli.as_deref()
                .and_then(CommandLine::parse)
                .or_else(|| file.and_then(CommandSource::into_command))
                .or_else(|| CommandLine::parse(fallback))
                .unwrap_or_else(|| CommandLine {
                    program: fallback.to_string(),
                    args: Vec::new(),
                })
        };

        let SearchConfig {
            bangs,
            default,
            search_menu,
            engine_menu,
            browser,
            address,
        } = config;

        Self {
            bangs,
            default: default.filter(|d| !d.is_empty()),
            search_menu: pick(&overrides.search_menu, search_menu, DEFAULT_SEARCH_MENU),
            engine_menu: pick(&overrides.engine_menu, engine_menu, DEFAULT_ENGINE_MENU),
            browser: pick(&overrides.browser, browser, DEFAULT_BROWSER),
            address: address
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
        }
    }

    /// The default engine key, if set.
    pub fn default_key(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Query template for an engine key.
    pub fn template(&self, key: &str) -> Option<&str> {
        self.bangs.get(key).map(String::as_str)
    }
}
