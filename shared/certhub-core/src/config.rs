//! Environment configuration helpers for microservices

use std::env;
use std::str::FromStr;

use crate::error::{CerthubError, Result};

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Read `name`, falling back to `default` when unset or empty.
pub fn env_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Read and parse `name`, falling back to `default` when unset or unparseable.
pub fn env_parsed<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Read `name` with a development fallback. In production the variable must
/// be set explicitly; store and broker addresses fall in this category.
pub fn required_in(app_env: AppEnv, name: &str, dev_default: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ if app_env == AppEnv::Production => Err(CerthubError::Config(format!(
            "{name} must be set when APP_ENV=production"
        ))),
        _ => Ok(dev_default.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_requires_explicit_value() {
        let err = required_in(AppEnv::Production, "CERTHUB_TEST_UNSET_VAR", "fallback");
        assert!(err.is_err());

        let ok = required_in(AppEnv::Development, "CERTHUB_TEST_UNSET_VAR", "fallback");
        assert_eq!(ok.unwrap(), "fallback");
    }

    #[test]
    fn env_parsed_falls_back_on_garbage() {
        std::env::set_var("CERTHUB_TEST_PARSED_VAR", "not-a-number");
        assert_eq!(env_parsed("CERTHUB_TEST_PARSED_VAR", 42u64), 42);
        std::env::remove_var("CERTHUB_TEST_PARSED_VAR");
    }
}
