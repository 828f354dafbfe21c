use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Whether task edits and deletes are restricted to the task's creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnershipPolicy {
    /// Any authenticated user may edit or delete any task.
    Shared,
    /// Only the creating user may edit or delete a task; others get 404.
    #[default]
    Owner,
}

impl FromStr for OwnershipPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(OwnershipPolicy::Shared),
            "owner" => Ok(OwnershipPolicy::Owner),
            other => Err(AppError::Configuration(format!(
                "TASK_OWNERSHIP must be 'shared' or 'owner', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    /// Signing secret; `None` when unset or blank.
    pub jwt_secret: Option<String>,
    pub bcrypt_cost: u32,
    pub task_ownership: OwnershipPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Configuration("DATABASE_URL must be set".into()))?;

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::Configuration(
                "BCRYPT_COST must be between 4 and 31".into(),
            ));
        }

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 4002)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret: lookup("JWT_SECRET")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            bcrypt_cost,
            task_ownership: parse_or(&lookup, "TASK_OWNERSHIP", OwnershipPolicy::default())?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Configuration(format!("{} is invalid: {}", key, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://test")])).unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 4002);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.jwt_secret, None);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.task_ownership, OwnershipPolicy::Owner);
        assert_eq!(config.server_url(), "http://127.0.0.1:4002");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://test"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("JWT_SECRET", "  s3cret  "),
            ("BCRYPT_COST", "4"),
            ("TASK_OWNERSHIP", "Shared"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.bcrypt_cost, 4);
        assert_eq!(config.task_ownership, OwnershipPolicy::Shared);
    }

    #[test]
    fn test_blank_secret_is_unconfigured() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "   "),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://test"),
            ("SERVER_PORT", "eighty"),
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://test"),
            ("BCRYPT_COST", "2"),
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://test"),
            ("TASK_OWNERSHIP", "everyone"),
        ]))
        .is_err());
    }
}
