//! Simple CLI configuration loader for sheetnav
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./sheetnav.json or ./.sheetnav/config.json
//! 3. Git repository root: <repo_root>/.sheetnav/config.json
//! 4. User config dir: <config_dir>/sheetnav/config.json
//! 5. Builtin cheat-sheet route table (no files)

use anyhow::{anyhow, Context, Result};
use sheetnav_core::{AnalyticsConfig, SiteConfig};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in directories
const CONFIG_FILE: &str = "sheetnav.json";

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Builtin,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Builtin => write!(f, "builtin route table"),
        }
    }
}

/// A validated site configuration and its origin
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub site: SiteConfig,
    pub source: ConfigSource,
}

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    analytics_id_override: Option<String>,
    case_sensitive_override: Option<bool>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            analytics_id_override: None,
            case_sensitive_override: None,
        }
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Enable analytics with the given measurement id
    pub fn with_analytics_id_override(mut self, id: String) -> Self {
        self.analytics_id_override = Some(id);
        self
    }

    /// Force case-sensitive matching on or off
    pub fn with_case_sensitive_override(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive_override = Some(case_sensitive);
        self
    }

    /// Load, override and validate the configuration
    pub async fn load(&self) -> Result<LoadedConfig> {
        // Step 1: Find and load base configuration
        let (mut site, source) = if let Some(override_path) = &self.config_override {
            let expanded = expand_path(override_path);
            let (site, path) = self.load_from_path(&expanded).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?;
            (site, ConfigSource::File(path))
        } else {
            self.search_and_load().await?
        };
        debug!("Using configuration from {}", source);

        // Step 2: Environment overrides
        if let Ok(id) = std::env::var("SHEETNAV_ANALYTICS_ID") {
            if !id.is_empty() {
                site.analytics = AnalyticsConfig::with_measurement_id(id);
            }
        }
        if let Ok(value) = std::env::var("SHEETNAV_CASE_SENSITIVE") {
            site.router.case_sensitive = parse_bool(&value)
                .with_context(|| "Invalid SHEETNAV_CASE_SENSITIVE value")?;
        }

        // Step 3: Flag overrides
        if let Some(id) = &self.analytics_id_override {
            site.analytics = AnalyticsConfig::with_measurement_id(id.clone());
        }
        if let Some(case_sensitive) = self.case_sensitive_override {
            site.router.case_sensitive = case_sensitive;
        }

        // Step 4: Validate
        site.validate()
            .map_err(|e| anyhow!("Configuration validation failed ({}): {}", source, e))?;

        Ok(LoadedConfig { site, source })
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<(SiteConfig, ConfigSource)> {
        let mut candidates = Vec::new();

        // 1. Current working directory
        let cwd = std::env::current_dir()?;
        candidates.push(cwd.join(CONFIG_FILE));
        candidates.push(cwd.join(".sheetnav").join("config.json"));

        // 2. Git repository root
        if let Some(git_root) = self.find_git_root()? {
            candidates.push(git_root.join(".sheetnav").join("config.json"));
        }

        // 3. User config directory
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("sheetnav").join("config.json"));
        }

        for candidate in candidates {
            if candidate.is_file() {
                let site = self.load_file(&candidate).await?;
                return Ok((site, ConfigSource::File(candidate)));
            }
        }

        // 4. Builtin table
        Ok((SiteConfig::builtin(), ConfigSource::Builtin))
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<(SiteConfig, PathBuf)> {
        if path.is_file() {
            Ok((self.load_file(path).await?, path.to_path_buf()))
        } else if path.is_dir() {
            let config_file = path.join(CONFIG_FILE);
            if config_file.exists() {
                Ok((self.load_file(&config_file).await?, config_file))
            } else {
                Err(anyhow!(
                    "No {} found in directory: {}",
                    CONFIG_FILE,
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<SiteConfig> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        SiteConfig::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find git repository root
    fn find_git_root(&self) -> Result<Option<PathBuf>> {
        let mut current = std::env::current_dir()?;

        loop {
            if current.join(".git").exists() {
                return Ok(Some(current));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand `~` and environment variables in a user-supplied path
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected true/false, got '{}'", other)),
    }
}
