//! Configuration for the payments reconciliation report

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::constants;

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml
#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub currency: CurrencyConfig,
    pub wallets: Vec<WalletConfig>,
}

/// Currency display settings
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// Ticker printed after each amount
    #[serde(default = "default_ticker")]
    pub ticker: String,
    /// Number of decimal places in one atomic unit
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

fn default_ticker() -> String {
    constants::DEFAULT_TICKER.to_string()
}

fn default_decimals() -> u32 {
    constants::DEFAULT_DECIMALS
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            ticker: default_ticker(),
            decimals: default_decimals(),
        }
    }
}

/// A wallet to report on
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// Short name used with --wallet
    pub name: String,
    /// Label shown in the report headers (e.g. "@FranklinRain")
    pub title: String,
    /// Wallet address
    pub address: String,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).with_context(|| {
            "Failed to parse config. Check for:\n\
             - At least one [[wallets]] entry with name, title and address\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\n\
             See config.toml.example for the expected format."
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicitly given config file, or config.toml when present
    ///
    /// Only a missing default config.toml falls back to the built-in wallet; an
    /// explicit path must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = Path::new(constants::CONFIG_FILE);
        if default_path.exists() {
            Self::load(default_path)
        } else {
            tracing::debug!("{} not found, using built-in wallet", default_path.display());
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.wallets.is_empty() {
            anyhow::bail!("No wallets configured");
        }
        if self.currency.decimals > 18 {
            anyhow::bail!("currency.decimals must be at most 18, got {}", self.currency.decimals);
        }
        for wallet in &self.wallets {
            validate_address(&wallet.address)
                .with_context(|| format!("Invalid address for wallet '{}'", wallet.name))?;
        }
        Ok(())
    }

    /// Find a wallet by name (first configured wallet when no name is given)
    pub fn wallet(&self, name: Option<&str>) -> Result<&WalletConfig> {
        match name {
            None => self.wallets.first().context("No wallets configured"),
            Some(name) => self.wallets.iter().find(|w| w.name == name).with_context(|| {
                let known: Vec<&str> = self.wallets.iter().map(|w| w.name.as_str()).collect();
                format!("Unknown wallet '{}'. Configured wallets: {}", name, known.join(", "))
            }),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyConfig::default(),
            wallets: vec![WalletConfig {
                name: constants::DEFAULT_WALLET_NAME.to_string(),
                title: constants::DEFAULT_WALLET_TITLE.to_string(),
                address: constants::DEFAULT_WALLET_ADDRESS.to_string(),
            }],
        }
    }
}

/// Check that an address looks like a standard TurtleCoin address
pub fn validate_address(address: &str) -> Result<()> {
    if !address.starts_with(constants::ADDRESS_PREFIX) {
        anyhow::bail!("Address must start with '{}': {}", constants::ADDRESS_PREFIX, address);
    }
    if address.len() != constants::ADDRESS_LENGTH {
        anyhow::bail!(
            "Address must be {} characters, got {}",
            constants::ADDRESS_LENGTH,
            address.len()
        );
    }
    Ok(())
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Parameters for a single report run
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Address whose activity is being reconciled
    pub self_address: String,
    /// Label shown in the report headers
    pub title: String,
    /// Ticker printed after each amount
    pub ticker: String,
    /// Decimal places of the atomic unit
    pub decimals: u32,
}

impl ReportConfig {
    /// Build the runtime config from the file config and CLI overrides
    ///
    /// An explicit address takes precedence over the wallet selection; its title
    /// defaults to the address itself.
    pub fn from_file(
        file_config: &FileConfig,
        wallet: Option<&str>,
        address: Option<String>,
        title: Option<String>,
    ) -> Result<Self> {
        let (self_address, default_title) = match address {
            Some(address) => {
                validate_address(&address)?;
                let title = address.clone();
                (address, title)
            }
            None => {
                let wallet = file_config.wallet(wallet)?;
                (wallet.address.clone(), wallet.title.clone())
            }
        };

        Ok(Self {
            self_address,
            title: title.unwrap_or(default_title),
            ticker: file_config.currency.ticker.clone(),
            decimals: file_config.currency.decimals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(fill: char) -> String {
        let mut address = constants::ADDRESS_PREFIX.to_string();
        address.extend(std::iter::repeat_n(fill, constants::ADDRESS_LENGTH - address.len()));
        address
    }

    fn two_wallets() -> String {
        format!(
            r#"
[currency]
ticker = "TRTL"

[[wallets]]
name = "rain"
title = "@FranklinRain"
address = "{}"

[[wallets]]
name = "tips"
title = "@TipBot"
address = "{}"
"#,
            address('a'),
            address('b')
        )
    }

    #[test]
    fn test_default_config_uses_rain_wallet() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());

        let report = ReportConfig::from_file(&config, None, None, None).unwrap();
        assert_eq!(report.self_address, constants::DEFAULT_WALLET_ADDRESS);
        assert_eq!(report.title, "@FranklinRain");
        assert_eq!(report.ticker, "TRTL");
        assert_eq!(report.decimals, 2);
    }

    #[test]
    fn test_parse_selects_wallet_by_name() {
        let config = FileConfig::parse(&two_wallets()).unwrap();
        assert_eq!(config.currency.decimals, 2);

        let report = ReportConfig::from_file(&config, Some("tips"), None, None).unwrap();
        assert_eq!(report.self_address, address('b'));
        assert_eq!(report.title, "@TipBot");

        let first = ReportConfig::from_file(&config, None, None, None).unwrap();
        assert_eq!(first.title, "@FranklinRain");
    }

    #[test]
    fn test_unknown_wallet_lists_known() {
        let config = FileConfig::parse(&two_wallets()).unwrap();
        let err = config.wallet(Some("nope")).unwrap_err();
        assert!(err.to_string().contains("rain, tips"));
    }

    #[test]
    fn test_address_override() {
        let config = FileConfig::default();
        let report =
            ReportConfig::from_file(&config, Some("ignored"), Some(address('c')), None).unwrap();
        assert_eq!(report.self_address, address('c'));
        assert_eq!(report.title, address('c'));

        let titled = ReportConfig::from_file(
            &config,
            None,
            Some(address('c')),
            Some("@Other".to_string()),
        )
        .unwrap();
        assert_eq!(titled.title, "@Other");
    }

    #[test]
    fn test_invalid_addresses_rejected() {
        assert!(validate_address(&address('x')).is_ok());
        assert!(validate_address("TRTLshort").is_err());
        assert!(validate_address(&address('x').replacen("TRTL", "XXXX", 1)).is_err());

        let bad = two_wallets().replace(&address('b'), "TRTLbad");
        let err = FileConfig::parse(&bad).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid address for wallet 'tips'"));
    }

    #[test]
    fn test_no_wallets_rejected() {
        assert!(FileConfig::parse("wallets = []").is_err());
        assert!(FileConfig::parse("[currency]\nticker = \"TRTL\"").is_err());
    }

    #[test]
    fn test_explicit_missing_config_file_is_an_error() {
        let err = FileConfig::load_or_default(Some(Path::new("/nonexistent/tipz.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tipz.toml"));
    }
}
