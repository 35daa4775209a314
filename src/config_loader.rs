use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::config::LedgerConfig;
use crate::errors::{LedgerError, LedgerResult};

pub const CONFIG_FILE: &str = "rigledger.toml";
pub const ENV_PREFIX: &str = "RIGLEDGER_";

/// Layered load: built-in defaults, then `rigledger.toml`, then
/// `RIGLEDGER_*` environment variables winning last
pub fn load_config() -> LedgerResult<LedgerConfig> {
    let figment = Figment::from(Serialized::defaults(LedgerConfig::default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX));

    let config: LedgerConfig = figment
        .extract()
        .map_err(|e| LedgerError::config(format!("invalid configuration: {e}")))?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_then_env_layering() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "capacity = 64\nbackend = \"memory\"")?;
            jail.set_env("RIGLEDGER_PAGE_SIZE", "25");

            let config = load_config().map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.capacity, 64);
            assert_eq!(config.backend, "memory");
            assert_eq!(config.page_size, 25);
            assert_eq!(config.log_level, "info");
            Ok(())
        });
    }

    #[test]
    fn invalid_file_values_are_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "capacity = 0")?;
            assert!(load_config().is_err());
            Ok(())
        });
    }
}
