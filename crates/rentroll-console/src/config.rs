/*
[INPUT]:  YAML configuration file, RENTROLL__* environment variables
[OUTPUT]: Parsed and validated console configuration
[POS]:    Configuration layer - backend, businesses, report defaults
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use config::{Config, Environment, File, FileFormat};
use rentroll_adapter::{ClientConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

use crate::report::PageSetup;
use crate::session::Business;

/// Looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "rentroll.yaml";
/// Prefix of environment overrides, e.g. `RENTROLL__SERVER__BASE_URL`
pub const ENV_PREFIX: &str = "RENTROLL";

/// Top-level configuration for the console
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Businesses the console may work on
    #[serde(default)]
    pub businesses: Vec<BusinessConfig>,
    /// BUD used when `--business` is not given; first entry otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_business: Option<String>,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BusinessConfig {
    pub bid: i64,
    /// Business unit designation, e.g. `REX`
    pub bud: String,
}

/// Report viewer defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_name")]
    pub default_report: String,
    #[serde(default)]
    pub page: PageSetup,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_report: default_report_name(),
            page: PageSetup::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_report_name() -> String {
    "RPTrr".to_string()
}

impl AppConfig {
    /// Load the YAML file (required when `path` is given) and apply env overrides
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Yaml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false),
        };
        let config: Self = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("read configuration")?
            .try_deserialize()
            .context("parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML text without touching the environment
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("failed to serialize config to YAML")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.businesses.is_empty() {
            bail!("no businesses configured");
        }
        if let Some(business) = self.businesses.iter().find(|b| b.bid <= 0) {
            bail!("business {} has invalid BID {}", business.bud, business.bid);
        }
        if let Some(bud) = &self.default_business {
            if self.find_business(bud).is_none() {
                bail!("default business {bud} is not configured");
            }
        }
        if self.server.base_url.trim().is_empty() {
            bail!("server.base_url is empty");
        }
        if self.server.timeout_secs == 0 {
            bail!("server.timeout_secs must be positive");
        }
        if self.report.page.pdf_page().is_err() {
            bail!("report page size is invalid");
        }
        Ok(())
    }

    fn find_business(&self, bud: &str) -> Option<&BusinessConfig> {
        self.businesses
            .iter()
            .find(|business| business.bud.eq_ignore_ascii_case(bud))
    }

    /// Resolve `--business`, the configured default, or the first entry
    pub fn business(&self, requested: Option<&str>) -> anyhow::Result<Business> {
        let chosen = match requested.or(self.default_business.as_deref()) {
            Some(bud) => self
                .find_business(bud)
                .with_context(|| format!("business {bud} is not configured"))?,
            None => self.businesses.first().context("no businesses configured")?,
        };
        Ok(Business {
            bid: chosen.bid,
            bud: chosen.bud.clone(),
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.server.timeout_secs),
            connect_timeout: Duration::from_secs(self.server.connect_timeout_secs),
        }
    }

    /// Starter file written by `init`
    pub fn starter(base_url: String, bid: i64, bud: String) -> Self {
        Self {
            server: ServerConfig {
                base_url,
                ..ServerConfig::default()
            },
            businesses: vec![BusinessConfig { bid, bud: bud.clone() }],
            default_business: Some(bud),
            report: ReportConfig::default(),
        }
    }
}
