use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::model::city::CitySelection;

/// Standard applied when a calculation request names no city.
pub const DEFAULT_CITY: &str = "佛山";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Default standard selection
    pub default_city: String,
    pub default_city_year: Option<i32>,

    // Rate limiting
    pub rate_calculate_per_min: u32,
    pub rate_upload_per_min: u32,

    pub log_dir: String,
    pub run_migrations: bool,
}

impl Config {
    /// Reads the process environment; `.env` is loaded once by `main`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; missing required values fail.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),

            default_city: lookup("DEFAULT_CITY")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
            default_city_year: lookup("DEFAULT_CITY_YEAR")
                .map(|v| parse_value("DEFAULT_CITY_YEAR", v))
                .transpose()?,

            rate_calculate_per_min: parse_or("RATE_CALCULATE_PER_MIN", lookup("RATE_CALCULATE_PER_MIN"), 30)?,
            rate_upload_per_min: parse_or("RATE_UPLOAD_PER_MIN", lookup("RATE_UPLOAD_PER_MIN"), 60)?,

            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            run_migrations: parse_or("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"), true)?,
        })
    }

    pub fn default_selection(&self) -> CitySelection {
        CitySelection::new(self.default_city.clone(), self.default_city_year)
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => parse_value(name, v),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_apply_when_optional_values_absent() {
        let config = config_from(&[
            ("SERVER_ADDR", "127.0.0.1:8080"),
            ("DATABASE_URL", "mysql://localhost/contribution"),
        ])
        .unwrap();

        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.default_city, DEFAULT_CITY);
        assert_eq!(config.default_city_year, None);
        assert_eq!(config.rate_calculate_per_min, 30);
        assert_eq!(config.rate_upload_per_min, 60);
        assert!(config.run_migrations);
        assert_eq!(config.default_selection(), CitySelection::new(DEFAULT_CITY, None));
    }

    #[test]
    fn test_missing_database_url_fails_fast() {
        let err = config_from(&[("SERVER_ADDR", "127.0.0.1:8080")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));

        let err = config_from(&[("SERVER_ADDR", "127.0.0.1:8080"), ("DATABASE_URL", " ")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_overrides_and_invalid_numbers() {
        let config = config_from(&[
            ("SERVER_ADDR", "0.0.0.0:9000"),
            ("DATABASE_URL", "mysql://db/contribution"),
            ("DEFAULT_CITY", "广州"),
            ("DEFAULT_CITY_YEAR", "2024"),
            ("RUN_MIGRATIONS", "false"),
        ])
        .unwrap();
        assert_eq!(config.default_selection(), CitySelection::new("广州", Some(2024)));
        assert!(!config.run_migrations);

        let err = config_from(&[
            ("SERVER_ADDR", "0.0.0.0:9000"),
            ("DATABASE_URL", "mysql://db/contribution"),
            ("RATE_UPLOAD_PER_MIN", "lots"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "RATE_UPLOAD_PER_MIN", .. }));
    }
}
