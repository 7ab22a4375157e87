// common/src/config.rs
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use config::{Config as ConfigFile, File, Environment};
use crate::models::{Breakpoints, Theme};

/// Central configuration for the client state layer
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub notifications: NotificationConfig,
    pub theme: ThemeConfig,
    pub viewport: ViewportConfig,
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Lifetime of a notification in milliseconds
    pub ttl_ms: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub default_theme: Theme,
    pub light_chrome_color: String,
    pub dark_chrome_color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub mobile_breakpoint: u32,
    pub desktop_breakpoint: u32,
    /// Size reported when no display environment is attached
    pub fallback_width: u32,
    pub fallback_height: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub provider_url: String,
    pub max_session_days: u32,
    pub popup_width: u32,
    pub popup_height: u32,
    /// Key used by the simulated provider to sign delegations
    pub signing_secret: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// File backing durable local storage in the headless binary
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            notifications: NotificationConfig::default(),
            theme: ThemeConfig::default(),
            viewport: ViewportConfig::default(),
            identity: IdentityConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { ttl_ms: 5000 }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "nftropoly-theme".to_string(),
            default_theme: Theme::Dark,
            light_chrome_color: "#ffffff".to_string(),
            dark_chrome_color: "#0f172a".to_string(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        let breakpoints = Breakpoints::default();
        Self {
            mobile_breakpoint: breakpoints.mobile,
            desktop_breakpoint: breakpoints.desktop,
            fallback_width: 1200,
            fallback_height: 800,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            provider_url: "https://identity.ic0.app".to_string(),
            max_session_days: 8,
            popup_width: 400,
            popup_height: 600,
            signing_secret: "dev_secret".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "./data/local-storage.json".to_string(),
        }
    }
}

impl NotificationConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl ViewportConfig {
    pub fn breakpoints(&self) -> Breakpoints {
        Breakpoints {
            mobile: self.mobile_breakpoint,
            desktop: self.desktop_breakpoint,
        }
    }
}

impl IdentityConfig {
    /// Maximum validity of a delegation requested at login
    pub fn max_time_to_live(&self) -> Duration {
        Duration::from_secs(u64::from(self.max_session_days) * 24 * 3600)
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        // Get the run mode, defaulting to "development"
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Check if we're in the project root or a subcrate
                let mut path = PathBuf::from("./config");
                if !path.exists() {
                    path = PathBuf::from("../config");
                }
                path
            });

        tracing::info!("Loading configuration from {}", config_dir.display());
        tracing::info!("Using run mode: {}", run_mode);

        let config = ConfigFile::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", run_mode))).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Environment variables with prefix "APP", e.g. APP__NOTIFICATIONS__TTL_MS
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load from files and environment, falling back to built-in defaults
    pub fn from_env() -> Self {
        match Self::load() {
            Ok(config) => {
                tracing::info!("Configuration loaded from files and environment");
                config
            },
            Err(e) => {
                tracing::warn!("Failed to load configuration from files: {}", e);
                tracing::info!("Falling back to built-in defaults");
                Self::default()
            }
        }
    }
}
