use crate::checker::DEFAULT_COMMAND;
use crate::cli::output::OutputFormat;
use crate::filter::DEFAULT_INCLUDE;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = ".diffspell.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_branch: String,
    pub remote: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub cmd: String,
    pub dictionary: Vec<String>,
    pub dictionary_file: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,
    pub case_sensitive: bool,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_branch: "master".to_string(),
            remote: "origin".to_string(),
            include: DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
            cmd: DEFAULT_COMMAND.to_string(),
            dictionary: Vec::new(),
            dictionary_file: None,
            ignore_patterns: Vec::new(),
            case_sensitive: true,
            format: OutputFormat::Github,
        }
    }
}

/// Values given on the command line or through `INPUT_*` variables.
/// `None` leaves the file/default value in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_branch: Option<String>,
    pub remote: Option<String>,
    /// JSON list, as passed to the GitHub Action.
    pub include: Option<String>,
    /// JSON list, as passed to the GitHub Action.
    pub exclude: Option<String>,
    pub cmd: Option<String>,
    /// Space-separated words.
    pub dictionary: Option<String>,
    pub dictionary_file: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,
    pub format: Option<OutputFormat>,
}

/// Optional-everything view of a config file, so a file only overrides the
/// keys it actually sets.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    base_branch: Option<String>,
    remote: Option<String>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    cmd: Option<String>,
    dictionary: Option<Vec<String>>,
    dictionary_file: Option<PathBuf>,
    ignore_patterns: Option<Vec<String>>,
    case_sensitive: Option<bool>,
    format: Option<OutputFormat>,
}

impl Config {
    /// Load configuration with priority: CLI/env > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(Self::read_file(&global_path)?);
                log::debug!("Loaded global config {}", global_path.display());
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            config.merge(Self::read_file(&local_path)?);
            log::debug!("Loaded local config {}", local_path.display());
        }

        config.apply(overrides)?;
        Ok(config)
    }

    /// Parse a config file on its own, over the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge(Self::read_file(path)?);
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(&mut self, other: ConfigFile) {
        if let Some(v) = other.base_branch {
            self.base_branch = v;
        }
        if let Some(v) = other.remote {
            self.remote = v;
        }
        if let Some(v) = other.include {
            self.include = v;
        }
        if let Some(v) = other.exclude {
            self.exclude = v;
        }
        if let Some(v) = other.cmd {
            self.cmd = v;
        }
        if let Some(v) = other.dictionary {
            self.dictionary.extend(v);
        }
        if let Some(v) = other.dictionary_file {
            self.dictionary_file = Some(v);
        }
        if let Some(v) = other.ignore_patterns {
            self.ignore_patterns = v;
        }
        if let Some(v) = other.case_sensitive {
            self.case_sensitive = v;
        }
        if let Some(v) = other.format {
            self.format = v;
        }
    }

    fn apply(&mut self, overrides: Overrides) -> Result<()> {
        if let Some(v) = overrides.base_branch {
            self.base_branch = v;
        }
        if let Some(v) = overrides.remote {
            self.remote = v;
        }
        if let Some(json) = overrides.include {
            self.include = parse_pattern_list(&json).context("Invalid --include value")?;
        }
        if let Some(json) = overrides.exclude {
            self.exclude = parse_pattern_list(&json).context("Invalid --exclude value")?;
        }
        if let Some(v) = overrides.cmd {
            self.cmd = v;
        }
        if let Some(words) = overrides.dictionary {
            self.dictionary
                .extend(words.split_whitespace().map(String::from));
        }
        if let Some(v) = overrides.dictionary_file {
            self.dictionary_file = Some(v);
        }
        self.ignore_patterns.extend(overrides.ignore_patterns);
        if let Some(v) = overrides.format {
            self.format = v;
        }
        Ok(())
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "diffspell").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Parse a JSON list of glob patterns such as `["**/*.md", "docs/*.txt"]`.
/// An empty or blank value means no patterns.
pub fn parse_pattern_list(json: &str) -> Result<Vec<String>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).with_context(|| format!("Expected a JSON list of strings, got: {}", json))
}
