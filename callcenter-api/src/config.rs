/// Configuration management for the API server
///
/// Configuration comes from environment variables (plus a `.env` file in
/// development) and is parsed into typed sections once at startup.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `PORT`: port to bind to (default: 5000)
/// - `JWT_SECRET`: session token signing key, at least 32 characters (required)
/// - `APP_ENV`: `production` turns on Secure cookies and HSTS (default: development)
/// - `CORS_ORIGINS`: comma separated origins, `*` for any (default: *)
/// - `REQUEST_TIMEOUT_SECS`: per-request timeout (default: 30)
/// - `PASSWORD_CHANGE_MODE`: `verified` or `legacy_guard` (default: verified)
///
/// # Example
///
/// ```
/// use callcenter_api::config::Config;
///
/// let config = Config::from_lookup(|name| match name {
///     "DATABASE_URL" => Some("postgresql://localhost/callcenter".to_string()),
///     "JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_string()),
///     _ => None,
/// })
/// .unwrap();
///
/// assert_eq!(config.bind_address(), "0.0.0.0:5000");
/// ```

use callcenter_shared::services::auth::PasswordChangeMode;
use std::fmt;

/// Shortest accepted `JWT_SECRET`
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    /// Set, but unsafe to run with
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// `APP_ENV=production`
    pub production: bool,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    pub request_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for session token signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SecurityConfig {
    pub password_change_mode: PasswordChangeMode,
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// Reads `.env` first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from any variable source
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(var("PORT"), "PORT", 5000u16)?;

        let production = var("APP_ENV")
            .map(|v| v.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let cors_origins = var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec!["*".to_string()]);

        let request_timeout_secs =
            parse_or(var("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS", 30u64)?;
        if request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let max_connections =
            parse_or(var("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 10u32)?;

        let secret = var("JWT_SECRET").ok_or_else(|| {
            ConfigError::Misconfiguration(
                "JWT_SECRET must be set; there is no built-in signing key".to_string(),
            )
        })?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Misconfiguration(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            )));
        }

        let password_change_mode = parse_or(
            var("PASSWORD_CHANGE_MODE"),
            "PASSWORD_CHANGE_MODE",
            PasswordChangeMode::default(),
        )?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                production,
                cors_origins,
                request_timeout_secs,
            },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            jwt: JwtConfig { secret },
            security: SecurityConfig {
                password_change_mode,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
