pub mod check;
pub mod config;
pub mod fix;
pub mod watch;

use crate::config::ScribeConfig;
use anyhow::{Context, Result};
use scribe_common::AnalysisRequest;
use scribe_engine::{CompositeProvider, DEFAULT_MISSPELLINGS, MisspellingProvider, ProseLinter};
use std::io::Read;
use std::sync::Arc;
use tracing::info;

pub struct CommandContext {
    pub config: ScribeConfig,
    pub provider: Arc<CompositeProvider>,
}

impl CommandContext {
    pub fn new(config: ScribeConfig) -> Result<Self> {
        let provider = Arc::new(build_providers(&config)?);
        info!(providers = ?provider, "providers ready");
        Ok(Self { config, provider })
    }

    pub fn request(&self, text: impl Into<String>) -> AnalysisRequest {
        self.config.template().request(text)
    }
}

fn build_providers(config: &ScribeConfig) -> Result<CompositeProvider> {
    let providers = &config.providers;
    let mut builder = CompositeProvider::builder();

    if providers.misspelling {
        let table = DEFAULT_MISSPELLINGS
            .iter()
            .map(|(typo, fix)| (typo.to_string(), fix.to_string()))
            .chain(providers.misspellings.iter().map(|(typo, fix)| (typo.clone(), fix.clone())));
        builder = builder.with(MisspellingProvider::with_table(table));
    }
    if providers.prose_rules {
        let linter = ProseLinter::new(providers.rules.clone()).context("failed to set up prose rules")?;
        builder = builder.with(linter);
    }

    Ok(builder.build())
}

/// Reads `source`, where "-" means stdin
pub fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read {}", source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_engine::Provider;

    #[test]
    fn test_context_uses_configured_providers() {
        let mut config = ScribeConfig::default();
        config.providers.misspellings.insert("brun".to_string(), "brown".to_string());
        let ctx = CommandContext::new(config).unwrap();
        assert_eq!(ctx.provider.len(), 2);

        let text = "Fix teh quick brun fox.";
        let result = ctx.provider.analyze(&ctx.request(text)).unwrap();
        assert_eq!(result.apply_all(text), "Fix the quick brown fox.");
    }

    #[test]
    fn test_disabled_providers_are_skipped() {
        let mut config = ScribeConfig::default();
        config.providers.prose_rules = false;
        assert_eq!(CommandContext::new(config.clone()).unwrap().provider.len(), 1);

        config.providers.misspelling = false;
        let ctx = CommandContext::new(config).unwrap();
        assert!(ctx.provider.is_empty());
        assert!(ctx.provider.analyze(&ctx.request("teh")).unwrap().is_empty());
    }

    #[test]
    fn test_missing_word_list_fails_setup() {
        let mut config = ScribeConfig::default();
        config.providers.rules.word_list = Some("/no/such/words.txt".into());
        assert!(CommandContext::new(config).is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("draft.txt");
        std::fs::write(&path, "a draft").unwrap();
        assert_eq!(read_input(path.to_str().unwrap()).unwrap(), "a draft");
        assert!(read_input(dir.path().join("missing.txt").to_str().unwrap()).is_err());
    }
}
