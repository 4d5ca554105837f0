//! # Genesis Configuration File
//!
//! YAML file read by `burnstake init`:
//!
//! ```yaml
//! ledger:
//!   cooldown_secs: 604800
//!   default_batch_limit: 20
//!   rate_scale: 1000000000000000000
//!   asset_weights:
//!     STK: 2000000000000000000
//!   triggered_sweep: atomic
//! admins:
//!   - treasury
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use burnstake_core::AccountId;
use burnstake_ledger::LedgerConfig;

/// Contents of a genesis configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Initial ledger configuration.
    pub ledger: LedgerConfig,
    /// Accounts holding the administrative capability.
    #[serde(default)]
    pub admins: Vec<AccountId>,
}

impl CliConfig {
    /// Parse a YAML document and validate the ledger section.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("malformed configuration")?;
        config
            .ledger
            .validate()
            .context("invalid ledger configuration")?;
        if config.admins.is_empty() {
            tracing::warn!("no admins configured; configuration will be frozen at genesis");
        }
        Ok(config)
    }

    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnstake_core::{AssetId, RateScale, WeightRate};
    use burnstake_ledger::TriggeredSweepPolicy;

    #[test]
    fn test_parse_full_config() {
        let yaml = "
ledger:
  cooldown_secs: 30
  default_batch_limit: 4
  rate_scale: 1000
  asset_weights:
    STK: 2500
  triggered_sweep: best_effort
admins:
  - root
";
        let config = CliConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.ledger.cooldown_secs, 30);
        assert_eq!(config.ledger.rate_scale, RateScale::new(1000).unwrap());
        assert_eq!(
            config.ledger.weight_of(&AssetId::new("STK").unwrap()),
            WeightRate(2500)
        );
        assert_eq!(config.ledger.triggered_sweep, TriggeredSweepPolicy::BestEffort);
        assert_eq!(config.admins, vec![AccountId::new("root").unwrap()]);
    }

    #[test]
    fn test_defaults_apply() {
        let yaml = "ledger:\n  cooldown_secs: 1\n  default_batch_limit: 1\n";
        let config = CliConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.ledger.rate_scale, RateScale::UNIT);
        assert!(config.ledger.asset_weights.is_empty());
        assert!(config.admins.is_empty());
    }

    #[test]
    fn test_zero_batch_limit_rejected() {
        let yaml = "ledger:\n  cooldown_secs: 1\n  default_batch_limit: 0\n";
        assert!(CliConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_zero_scale_rejected() {
        let yaml = "ledger:\n  cooldown_secs: 1\n  default_batch_limit: 1\n  rate_scale: 0\n";
        assert!(CliConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "ledger:\n  cooldown_secs: 1\n  default_batch_limit: 1\nextra: true\n";
        assert!(CliConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }
}
