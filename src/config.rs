use std::env;

use crate::store::RowDecodePolicy;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub row_decode: RowDecodePolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to touch the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(url) => url,
            None => database_url_from_parts(&lookup),
        };
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("APP_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8081);
        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(10);
        let row_decode = match lookup("ORDER_ROW_DECODE") {
            Some(value) => value.parse::<RowDecodePolicy>()?,
            None => RowDecodePolicy::BestEffort,
        };

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            row_decode,
        })
    }
}

fn database_url_from_parts<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let part = |key: &str, default: &str| {
        lookup(key)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };
    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        part("DB_USER", "postgres"),
        part("DB_PASSWORD", "password"),
        part("DB_HOST", "localhost"),
        part("DB_PORT", "5432"),
        part("DB_NAME", "lugx_gaming"),
        part("DB_SSLMODE", "disable"),
    )
}
