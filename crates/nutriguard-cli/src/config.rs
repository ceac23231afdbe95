//! CLI configuration

use nutriguard_classifiers::ClassifierConfig;
use nutriguard_client::{ClientConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Product database base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Preference file; defaults to the platform data directory
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,

    /// User agent sent to the product database
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Denylists, thresholds and allergen catalog
    #[serde(default)]
    pub classifiers: ClassifierConfig,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &crate::Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config: Self = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };
        config.classifiers.validate()?;

        // Apply CLI overrides
        if let Some(url) = &cli.api_url {
            config.api_base_url = url.clone();
        }

        if let Some(path) = &cli.preferences {
            config.preferences_path = Some(path.clone());
        }

        Ok(config)
    }

    /// Where user preferences live
    pub fn preferences_path(&self) -> PathBuf {
        self.preferences_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join("nutriguard").join("preferences.json"))
                .unwrap_or_else(|| PathBuf::from("nutriguard-preferences.json"))
        })
    }

    /// HTTP settings for the product client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            preferences_path: None,
            user_agent: default_user_agent(),
            request_timeout_secs: default_timeout(),
            classifiers: ClassifierConfig::default(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("nutriguard/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    10
}
