use anyhow::{Context, Result};
use scribe_common::DEFAULT_LANGUAGE;
use scribe_engine::{DEFAULT_DEBOUNCE, RequestTemplate, RuleSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_ENV: &str = "SCRIBE_CONFIG";
const DEBOUNCE_ENV: &str = "SCRIBE_DEBOUNCE_MS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScribeConfig {
    pub analysis: AnalysisConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub language: String,
    pub debounce_ms: u64,
    /// Empty means every category
    pub enabled_categories: Vec<String>,
    pub disabled_rules: Vec<String>,
    pub user_dictionary: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub misspelling: bool,
    pub prose_rules: bool,
    /// Extra `typo = "fix"` pairs checked after the built-in table
    pub misspellings: BTreeMap<String, String>,
    pub rules: RuleSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            enabled_categories: Vec::new(),
            disabled_rules: Vec::new(),
            user_dictionary: Vec::new(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            misspelling: true,
            prose_rules: true,
            misspellings: BTreeMap::new(),
            rules: RuleSettings::default(),
        }
    }
}

impl ScribeConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `<config dir>/scribe/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scribe").join("config.toml"))
    }

    pub fn resolve_config(cli_config: Option<PathBuf>) -> Result<Self> {
        Self::resolve_from(
            cli_config,
            std::env::var(CONFIG_ENV).ok(),
            std::env::var(DEBOUNCE_ENV).ok(),
            Self::default_path(),
        )
    }

    /// Precedence: CLI path, then `$SCRIBE_CONFIG`, then the default path if
    /// it exists, then built-in defaults. `$SCRIBE_DEBOUNCE_MS` overrides the
    /// delay from any source.
    fn resolve_from(cli_config: Option<PathBuf>, env_config: Option<String>, env_debounce: Option<String>, default_path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(config_path) = cli_config {
            Self::load_from_file(config_path)?
        } else if let Some(env_config) = env_config {
            Self::load_from_file(env_config)?
        } else if let Some(path) = default_path.filter(|path| path.exists()) {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };

        if let Some(value) = env_debounce {
            config.analysis.debounce_ms = value.trim().parse().with_context(|| format!("{} must be a number of milliseconds, got {:?}", DEBOUNCE_ENV, value))?;
        }

        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.analysis.debounce_ms)
    }

    /// Request settings for every analysis run from this config
    pub fn template(&self) -> RequestTemplate {
        RequestTemplate {
            language: self.analysis.language.clone(),
            enabled_categories: self.analysis.enabled_categories.iter().cloned().collect(),
            disabled_rule_ids: self.analysis.disabled_rules.iter().cloned().collect(),
            user_dictionary: self.analysis.user_dictionary.iter().cloned().collect(),
            ..RequestTemplate::default()
        }
    }
}
