//! Connection settings shared by the gateway and the worker.
//!
//! Every loader takes a lookup function so callers decide where values come
//! from; [`from_env`](RedisConfig::from_env) variants read the process
//! environment. An empty value counts as missing.

/// Error raised while loading configuration. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("environment variable '{var}' has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn required_port<F>(lookup: &F, var: &'static str) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = required(lookup, var)?;
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

// ---------------------------------------------------------------------------
// Redis
// ---------------------------------------------------------------------------

/// Location of the Redis instance backing the state store and channel.
///
/// | Env Var      | Required |
/// |--------------|----------|
/// | `REDIS_HOST` | yes      |
/// | `REDIS_PORT` | yes      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

impl RedisConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: required(&lookup, "REDIS_HOST")?,
            port: required_port(&lookup, "REDIS_PORT")?,
        })
    }

    /// Connection URL understood by the `redis` client.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// Location and credentials of the PostgreSQL job log.
///
/// | Env Var      | Required |
/// |--------------|----------|
/// | `PGHOST`     | yes      |
/// | `PGPORT`     | yes      |
/// | `PGUSER`     | yes      |
/// | `PGPASSWORD` | yes      |
/// | `PGDATABASE` | yes      |
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl PostgresConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: required(&lookup, "PGHOST")?,
            port: required_port(&lookup, "PGPORT")?,
            user: required(&lookup, "PGUSER")?,
            password: required(&lookup, "PGPASSWORD")?,
            database: required(&lookup, "PGDATABASE")?,
        })
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const PG_VARS: [(&str, &str); 5] = [
        ("PGHOST", "db"),
        ("PGPORT", "5432"),
        ("PGUSER", "postgres"),
        ("PGPASSWORD", "hunter2"),
        ("PGDATABASE", "fibber"),
    ];

    #[test]
    fn redis_config_builds_url() {
        let config =
            RedisConfig::from_lookup(lookup_from(&[("REDIS_HOST", "cache"), ("REDIS_PORT", "6379")]))
                .unwrap();
        assert_eq!(config.url(), "redis://cache:6379/");
    }

    #[test]
    fn redis_config_requires_host() {
        let result = RedisConfig::from_lookup(lookup_from(&[("REDIS_PORT", "6379")]));
        assert_matches!(result, Err(ConfigError::Missing("REDIS_HOST")));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let result =
            RedisConfig::from_lookup(lookup_from(&[("REDIS_HOST", ""), ("REDIS_PORT", "6379")]));
        assert_matches!(result, Err(ConfigError::Missing("REDIS_HOST")));
    }

    #[test]
    fn non_numeric_port_is_invalid() {
        let result =
            RedisConfig::from_lookup(lookup_from(&[("REDIS_HOST", "cache"), ("REDIS_PORT", "abc")]));
        assert_matches!(result, Err(ConfigError::Invalid { var: "REDIS_PORT", .. }));
    }

    #[test]
    fn postgres_config_loads_all_five_vars() {
        let config = PostgresConfig::from_lookup(lookup_from(&PG_VARS)).unwrap();
        assert_eq!(config.host, "db");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, "fibber");
    }

    #[test]
    fn postgres_config_reports_each_missing_var() {
        for (missing, _) in PG_VARS {
            let remaining: Vec<_> = PG_VARS.iter().copied().filter(|(k, _)| *k != missing).collect();
            let result = PostgresConfig::from_lookup(lookup_from(&remaining));
            assert_matches!(result, Err(ConfigError::Missing(var)) if var == missing);
        }
    }

    #[test]
    fn postgres_debug_redacts_password() {
        let config = PostgresConfig::from_lookup(lookup_from(&PG_VARS)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
    }
}
