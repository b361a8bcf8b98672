/*
 * Responsibility
 * - Read settings from the environment (.env supported)
 * - Validate them; anything missing or malformed fails startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::context::cookie::is_valid_cookie_name;

const MAX_SESSION_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_seconds: u64,
    pub key_prefix: String,
}

#[derive(Debug, Clone)]
pub struct LocaleConfig {
    pub default_lang: String,
    pub supported: Vec<String>,
    pub translations_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub request_timeout_seconds: u64,
    pub body_limit_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,
    pub valkey_url: Option<String>,

    pub session: SessionConfig,
    pub locale: LocaleConfig,
    pub http: HttpConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let port: u16 = parse_or(get("PORT"), 3000, "PORT")?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections: u32 =
            parse_or(get("DATABASE_MAX_CONNECTIONS"), 5, "DATABASE_MAX_CONNECTIONS")?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }

        // Sessions must survive across instances in production.
        let valkey_url = get("VALKEY_URL");
        if app_env.is_production() && valkey_url.is_none() {
            return Err(ConfigError::Missing("VALKEY_URL"));
        }

        let cookie_name = get("SESSION_COOKIE_NAME").unwrap_or_else(|| "sid".to_string());
        if !is_valid_cookie_name(&cookie_name) {
            return Err(ConfigError::Invalid("SESSION_COOKIE_NAME"));
        }

        let ttl_seconds: u64 = parse_or(get("SESSION_TTL_SECONDS"), 24 * 60 * 60, "SESSION_TTL_SECONDS")?;
        if ttl_seconds == 0 || ttl_seconds > MAX_SESSION_TTL_SECONDS {
            return Err(ConfigError::Invalid("SESSION_TTL_SECONDS"));
        }

        let key_prefix = get("SESSION_KEY_PREFIX").unwrap_or_else(|| "session".to_string());

        let default_lang = get("DEFAULT_LOCALE")
            .unwrap_or_else(|| "en".to_string())
            .to_ascii_lowercase();
        let supported = split_list(get("SUPPORTED_LOCALES"))
            .into_iter()
            .map(|l| l.to_ascii_lowercase())
            .collect();
        let translations_dir = get("LOCALE_DIR").map(PathBuf::from);

        let request_timeout_seconds: u64 =
            parse_or(get("REQUEST_TIMEOUT_SECONDS"), 30, "REQUEST_TIMEOUT_SECONDS")?;
        let body_limit_bytes: usize =
            parse_or(get("REQUEST_BODY_LIMIT_BYTES"), 1024 * 1024, "REQUEST_BODY_LIMIT_BYTES")?;
        let cors_allowed_origins = split_list(get("CORS_ALLOWED_ORIGINS"));

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            valkey_url,
            session: SessionConfig {
                cookie_name,
                ttl_seconds,
                key_prefix,
            },
            locale: LocaleConfig {
                default_lang,
                supported,
                translations_dir,
            },
            http: HttpConfig {
                request_timeout_seconds,
                body_limit_bytes,
                cors_allowed_origins,
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    default: T,
    key: &'static str,
) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    const DB: (&str, &str) = ("DATABASE_URL", "postgres://localhost/app");

    #[test]
    fn defaults_apply() {
        let config = config(&[DB]).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.valkey_url, None);
        assert_eq!(config.session.cookie_name, "sid");
        assert_eq!(config.session.ttl_seconds, 86400);
        assert_eq!(config.session.key_prefix, "session");
        assert_eq!(config.locale.default_lang, "en");
        assert!(config.locale.supported.is_empty());
        assert_eq!(config.http.request_timeout_seconds, 30);
        assert_eq!(config.http.body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("DATABASE_URL"));
        assert_eq!(
            config(&[("DATABASE_URL", "  ")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
    }

    #[test]
    fn production_requires_valkey() {
        assert_eq!(
            config(&[DB, ("APP_ENV", "prod")]).unwrap_err(),
            ConfigError::Missing("VALKEY_URL")
        );

        let config = config(&[DB, ("APP_ENV", "Production"), ("VALKEY_URL", "redis://cache")]).unwrap();
        assert!(config.app_env.is_production());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(config(&[DB, ("PORT", "http")]).unwrap_err(), ConfigError::Invalid("PORT"));
        assert_eq!(
            config(&[DB, ("SESSION_TTL_SECONDS", "0")]).unwrap_err(),
            ConfigError::Invalid("SESSION_TTL_SECONDS")
        );
        assert_eq!(
            config(&[DB, ("SESSION_COOKIE_NAME", "my session")]).unwrap_err(),
            ConfigError::Invalid("SESSION_COOKIE_NAME")
        );
        assert_eq!(
            config(&[DB, ("DATABASE_MAX_CONNECTIONS", "0")]).unwrap_err(),
            ConfigError::Invalid("DATABASE_MAX_CONNECTIONS")
        );
    }

    #[test]
    fn lists_are_split_and_normalized() {
        let config = config(&[
            DB,
            ("DEFAULT_LOCALE", "DE"),
            ("SUPPORTED_LOCALES", "en, FR ,,it"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ])
        .unwrap();

        assert_eq!(config.locale.default_lang, "de");
        assert_eq!(config.locale.supported, vec!["en", "fr", "it"]);
        assert_eq!(
            config.http.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }
}
