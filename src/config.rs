use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ASSETS_DIR: &str = "public/assets";
pub const DEFAULT_BODY_LIMIT_MB: usize = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub assets_dir: PathBuf,
    pub body_limit_bytes: usize,
    pub jwt_expiration_hours: i64,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingEnvironmentVariable(String),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingEnvironmentVariable(var) => {
                write!(f, "Missing required environment variable: {var}")
            }
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| ConfigError::MissingEnvironmentVariable(key.to_string()))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        if jwt_secret.len() < 32 {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let assets_dir = lookup("ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));

        let body_limit_mb: usize = parse_or(&lookup, "BODY_LIMIT_MB", DEFAULT_BODY_LIMIT_MB)?;
        if body_limit_mb == 0 {
            return Err(ConfigError::InvalidValue(
                "BODY_LIMIT_MB must be greater than zero".to_string(),
            ));
        }

        let jwt_expiration_hours = parse_or(&lookup, "JWT_EXPIRATION_HOURS", 2)?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        let db_acquire_timeout_secs = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 30)?;

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            assets_dir,
            body_limit_bytes: body_limit_mb * 1024 * 1024,
            jwt_expiration_hours,
            db_max_connections,
            db_acquire_timeout_secs,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}
