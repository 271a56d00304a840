use thiserror::Error;

use crate::services::payment_gateway::STRIPE_API_BASE;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    /// Shared secret used to sign and verify bearer tokens
    pub access_key: String,
    pub payment_secret_key: String,
    pub payment_currency: String,
    pub stripe_api_base: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port_raw = get("PORT").unwrap_or_else(|| "5000".to_string());
        let port = port_raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port_raw.clone(),
        })?;

        // Either a full connection string or the Atlas-style credential triple
        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                require("DB_USER")?,
                require("DB_PASS")?,
                require("DB_CLUSTER")?
            ),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url,
            database_name: get("DB_NAME").unwrap_or_else(|| "CreativeSnap".to_string()),
            access_key: require("ACCESS_KEY")?,
            payment_secret_key: require("PAYMENT_SECRET_KEY")?,
            payment_currency: get("PAYMENT_CURRENCY").unwrap_or_else(|| "usd".to_string()),
            stripe_api_base: get("STRIPE_API_BASE").unwrap_or_else(|| STRIPE_API_BASE.to_string()),
        })
    }
}
