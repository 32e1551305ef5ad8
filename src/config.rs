//! Typed configuration loaded from the process environment.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Backend de persistência selecionado por `STORE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Memory,
}

/// Ten years; longer token lifetimes are rejected
pub const MAX_JWT_TTL_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub mongo_uri: Option<String>,
    pub production: bool,
    pub frontend_dir: PathBuf,
    pub jwt_secret: String,
    pub jwt_ttl_days: i64,
    pub cors_origins: Vec<String>,
    pub seed_products: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw.to_string(),
            })?,
            None => 5000,
        };

        let store = match get("STORE").map(str::to_ascii_lowercase).as_deref() {
            None | Some("mongo") | Some("mongodb") => StoreKind::Mongo,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE",
                    value: other.to_string(),
                })
            }
        };

        let mongo_uri = get("MONGO_URI").map(str::to_string);
        if store == StoreKind::Mongo && mongo_uri.is_none() {
            return Err(ConfigError::Missing("MONGO_URI"));
        }

        let jwt_secret = get("JWT_SECRET")
            .map(str::to_string)
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_ttl_days = match get("JWT_TTL_DAYS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(days) if (1..=MAX_JWT_TTL_DAYS).contains(&days) => days,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "JWT_TTL_DAYS",
                        value: raw.to_string(),
                    })
                }
            },
            None => 30,
        };

        let seed_products = match get("SEED_PRODUCTS").map(str::to_ascii_lowercase).as_deref() {
            None | Some("true") | Some("1") | Some("yes") => true,
            Some("false") | Some("0") | Some("no") => false,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "SEED_PRODUCTS",
                    value: other.to_string(),
                })
            }
        };

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or("*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Config {
            host: get("HOST").unwrap_or("0.0.0.0").to_string(),
            port,
            store,
            mongo_uri,
            production: get("APP_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production")),
            frontend_dir: PathBuf::from(get("FRONTEND_DIR").unwrap_or("frontend/build")),
            jwt_secret,
            jwt_ttl_days,
            cors_origins,
            seed_products,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}
