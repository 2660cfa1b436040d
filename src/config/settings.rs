use anyhow::{anyhow, Result};
use ::config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::types::{Symbol, DEFAULT_SYMBOL};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const ENV_PREFIX: &str = "TRADING_CONSOLE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the account server, without a trailing path.
    pub base_url: String,
    /// Symbol used for positions and close-all.
    pub symbol: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, then the TOML file if it exists, then `TRADING_CONSOLE_*`
    /// variables (a `.env` file is read first).
    pub fn load(path: &Path) -> Result<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", env_file.display());
        }

        let builder = Self::defaults()?
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));

        let config: ClientConfig = builder.build()?.try_deserialize()?;
        config.checked()
    }

    #[cfg(test)]
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ClientConfig = Self::defaults()?
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.checked()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let defaults = ClientConfig::default();
        Ok(Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("symbol", defaults.symbol)?)
    }

    /// Command-line overrides win over every other source.
    pub fn with_overrides(mut self, base_url: Option<String>, symbol: Option<String>) -> Result<Self> {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(symbol) = symbol {
            self.symbol = symbol;
        }
        self.checked()
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            errors.push(format!("base_url '{}' must start with http:// or https://", self.base_url));
        }
        if let Err(e) = Symbol::parse(&self.symbol) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn checked(self) -> Result<Self> {
        self.validate()
            .map_err(|errors| anyhow!("Invalid configuration: {}", errors.join(", ")))?;
        Ok(self)
    }

    pub fn symbol(&self) -> Result<Symbol> {
        Symbol::parse(&self.symbol).map_err(|e| anyhow!(e))
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
