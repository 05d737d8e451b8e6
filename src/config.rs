use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub quota: QuotaConfig,
}

/// Database connection pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

/// Quota and throttling configuration
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    /// Max questions a user may generate per reference day
    pub daily_question_cap: i64,
    /// Max questions in a single generation request, regardless of daily remaining
    pub max_questions_per_request: i64,
    /// Max registration attempts per client IP per reference day
    pub registration_ip_daily_cap: i64,
    /// Fixed UTC offset (hours) defining the reference day boundary.
    /// The question bank's audience lives in UTC-3; no DST adjustment.
    pub day_offset_hours: i32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            database: DatabaseConfig::from_env()?,
            quota: QuotaConfig::from_env(),
        })
    }
}

impl QuotaConfig {
    /// Load quota configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            daily_question_cap: env::var("DAILY_QUESTION_CAP")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            max_questions_per_request: env::var("MAX_QUESTIONS_PER_REQUEST")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            registration_ip_daily_cap: env::var("REGISTRATION_IP_DAILY_CAP")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
            day_offset_hours: env::var("QUOTA_DAY_OFFSET_HOURS")
                .unwrap_or_else(|_| "-3".to_string())
                .parse()
                .unwrap_or(-3),
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_question_cap: 30,
            max_questions_per_request: 5,
            registration_ip_daily_cap: 3,
            day_offset_hours: -3,
        }
    }
}

impl DatabaseConfig {
    /// Load database configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            url,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            acquire_timeout: Duration::from_secs(
                env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            ),
            idle_timeout: Duration::from_secs(
                env::var("DATABASE_IDLE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .unwrap_or(600),
            ),
            max_lifetime: Duration::from_secs(
                env::var("DATABASE_MAX_LIFETIME_SECS")
                    .unwrap_or_else(|_| "1800".to_string())
                    .parse()
                    .unwrap_or(1800),
            ),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    MissingDatabaseUrl,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "PORT must be a valid number"),
            ConfigError::MissingDatabaseUrl => {
                write!(f, "DATABASE_URL environment variable is required")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
