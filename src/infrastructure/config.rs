use actix_web::http::Uri;
use chrono::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["https://www.esim.com.mm", "http://localhost:3000"];

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Process configuration, built once at startup and handed to the
/// components that need it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Reads the process environment. `.env` is loaded by the binary before
    /// logging starts, so this only sees the merged environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // No fallback secret.
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: value.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(value) => match value.parse::<i64>() {
                Ok(m) if m > 0 => m,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                        value,
                    });
                }
            },
            None => DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
        };

        let cors_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(parse_origin)
                .collect::<Result<Vec<_>, _>>()?,
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            access_token_ttl: Duration::minutes(minutes),
            cors_origins,
        })
    }
}

/// An allowed origin must be an absolute `http`/`https` URL with a host.
/// A wildcard is refused because the CORS layer sends credentials.
fn parse_origin(origin: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: "CORS_ALLOWED_ORIGINS",
        value: origin.to_string(),
    };

    if origin == "*" {
        return Err(invalid());
    }
    let uri: Uri = origin.parse().map_err(|_| invalid())?;
    let scheme_ok = matches!(uri.scheme_str(), Some("http") | Some("https"));
    let host_ok = uri.host().is_some_and(|h| !h.is_empty());
    if !scheme_ok || !host_ok {
        return Err(invalid());
    }

    Ok(origin.to_string())
}
