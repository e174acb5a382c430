//! Gate service configuration.

use common::{env_lookup, BootstrapConfig, ConfigError, DatabaseConfig, TokenConfig};

/// Everything the gate service binary needs at startup.
#[derive(Debug, Clone)]
pub struct GateServiceConfig {
    pub database: DatabaseConfig,
    pub tokens: TokenConfig,
    /// Apply pending migrations before bootstrapping
    pub migrate_on_start: bool,
    /// First admin, when configured
    pub bootstrap: Option<BootstrapConfig>,
}

impl GateServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let migrate_on_start = match lookup("MIGRATE_ON_START") {
            Some(raw) => parse_flag(&raw)?,
            None => true,
        };

        Ok(Self {
            database: DatabaseConfig::from_lookup(&lookup)?,
            tokens: TokenConfig::from_lookup(&lookup)?,
            migrate_on_start,
            bootstrap: BootstrapConfig::from_lookup(&lookup),
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            var: "MIGRATE_ON_START",
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/gate"),
        ("JWT_SECRET", "access-secret-access-secret-access-secret"),
        ("JWT_REFRESH_SECRET", "refresh-secret-refresh-secret-refresh-secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = GateServiceConfig::from_lookup(lookup(&BASE)).unwrap();
        assert!(config.migrate_on_start);
        assert!(config.bootstrap.is_none());
        assert_eq!(config.database.url, "postgres://localhost/gate");
    }

    #[test]
    fn test_migrate_flag_and_bootstrap() {
        let mut vars = BASE.to_vec();
        vars.push(("MIGRATE_ON_START", "off"));
        vars.push(("BOOTSTRAP_ADMIN_EMAIL", "root@example.com"));
        vars.push(("BOOTSTRAP_ADMIN_PASSWORD", "pw"));

        let config = GateServiceConfig::from_lookup(lookup(&vars)).unwrap();
        assert!(!config.migrate_on_start);
        assert_eq!(config.bootstrap.unwrap().email, "root@example.com");
    }

    #[test]
    fn test_bad_flag() {
        let mut vars = BASE.to_vec();
        vars.push(("MIGRATE_ON_START", "maybe"));
        assert!(matches!(
            GateServiceConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { var: "MIGRATE_ON_START", .. })
        ));
    }

    #[test]
    fn test_missing_secret() {
        let vars = [BASE[0], BASE[1]];
        assert_eq!(
            GateServiceConfig::from_lookup(lookup(&vars)).unwrap_err(),
            ConfigError::Missing("JWT_REFRESH_SECRET")
        );
    }
}
