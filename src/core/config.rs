use crate::core::assistant::AiCapability;
use crate::core::currency::{CurrencyCode, currency_for_locale};
use crate::core::favorites::{FavoritePair, Favorites};
use crate::core::history::MissingRatePolicy;
use crate::core::rates::RateTable;
use crate::providers::gemini::GeminiClient;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct MockProviderConfig {
    /// Simulated delay before rates are returned; history waits 1.4× as long.
    pub latency_ms: u64,
}

impl Default for MockProviderConfig {
    fn default() -> Self {
        MockProviderConfig { latency_ms: 500 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            retries: 2,
            retry_delay_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    pub mock: MockProviderConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// When unset, derived from `$LANG`.
    pub base_currency: Option<CurrencyCode>,
    pub target_currency: CurrencyCode,
    pub history_days: u32,
    pub missing_rate_policy: MissingRatePolicy,
    pub favorites: Vec<FavoritePair>,
    /// Custom USD-anchored table replacing the built-in one.
    pub rates: Option<BTreeMap<CurrencyCode, f64>>,
    pub providers: ProvidersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: None,
            target_currency: CurrencyCode::EUR,
            history_days: 7,
            missing_rate_policy: MissingRatePolicy::default(),
            favorites: Vec::new(),
            rates: None,
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to defaults when it doesn't exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxdesk", "fxdesk")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Configured base, else the currency of `$LANG`, else USD.
    pub fn base_currency(&self) -> CurrencyCode {
        self.base_currency.unwrap_or_else(|| {
            let locale = std::env::var("LANG").unwrap_or_default();
            currency_for_locale(&locale)
        })
    }

    pub fn rate_table(&self) -> Result<Arc<RateTable>> {
        match &self.rates {
            Some(rates) => {
                let table = RateTable::new(rates.iter().map(|(c, r)| (*c, *r)))
                    .context("Invalid rate table in config")?;
                Ok(Arc::new(table))
            }
            None => Ok(Arc::new(RateTable::builtin().clone())),
        }
    }

    pub fn favorites(&self) -> Result<Favorites> {
        Favorites::from_pairs(self.favorites.iter().copied())
            .context("Invalid favorites in config")
    }

    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.providers.mock.latency_ms)
    }

    /// The API key from config, else from the environment.
    pub fn gemini_api_key(&self) -> Option<String> {
        let configured = self.providers.gemini.api_key.clone();
        configured
            .into_iter()
            .chain(API_KEY_VARS.iter().filter_map(|var| std::env::var(var).ok()))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    pub fn ai_capability(&self) -> Result<AiCapability> {
        let Some(api_key) = self.gemini_api_key() else {
            warn!("Gemini API key is not configured, AI features are disabled");
            return Ok(AiCapability::Unavailable);
        };
        let client = GeminiClient::new(&self.providers.gemini, api_key)?;
        Ok(AiCapability::Client(Arc::new(client)))
    }
}
