use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use chrono::Duration;
use dressrosa_core::AppError;
use tracing_subscriber::EnvFilter;

/// What the binary does after connecting and migrating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Serve the HTTP API.
    Serve,
    /// Apply migrations and exit.
    Migrate,
    /// Seed roles, the bootstrap admin and the default leave catalog, then exit.
    Seed,
}

impl RunMode {
    fn from_argument(argument: Option<&str>) -> Result<Self, AppError> {
        match argument {
            None | Some("serve") => Ok(Self::Serve),
            Some("migrate") => Ok(Self::Migrate),
            Some("seed") => Ok(Self::Seed),
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}', expected 'serve', 'migrate' or 'seed'"
            ))),
        }
    }
}

/// Account created by `seed` when no user has the configured username.
#[derive(Debug, Clone)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub run_mode: RunMode,
    pub environment: String,
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub api_v1_prefix: String,
    pub access_token_ttl: Duration,
    pub session_cookie_name: String,
    pub session_cookie_secure: bool,
    pub bootstrap_admin: BootstrapAdminConfig,
}

impl ApiConfig {
    /// Loads `.env` and the environment overlay, then reads the process environment.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_owned())
            .trim()
            .to_lowercase();
        if let Some(overlay) = overlay_file(&environment) {
            dotenvy::from_filename_override(overlay).ok();
        }

        Self::from_lookup(env::args().nth(1).as_deref(), |name| env::var(name).ok())
    }

    /// Builds the configuration from a command argument and a variable lookup.
    pub fn from_lookup(
        command: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let run_mode = RunMode::from_argument(command)?;
        let environment = lookup("ENVIRONMENT")
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "development".to_owned());

        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parse_or("API_PORT", lookup("API_PORT"), 8000_u16)?;

        let api_v1_prefix = normalize_prefix(
            lookup("API_V1_PREFIX")
                .unwrap_or_else(|| "/api/v1".to_owned())
                .as_str(),
        );

        let access_token_minutes = parse_or(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            lookup("ACCESS_TOKEN_EXPIRE_MINUTES"),
            120_i64,
        )?;
        if access_token_minutes <= 0 {
            return Err(AppError::Validation(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be positive".to_owned(),
            ));
        }

        let session_cookie_name =
            lookup("SESSION_COOKIE_NAME").unwrap_or_else(|| "dressrosa_session".to_owned());
        let session_cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .map(|value| parse_flag(&value))
            .unwrap_or(environment == "production");

        let bootstrap_admin = BootstrapAdminConfig {
            username: lookup("BOOTSTRAP_ADMIN_USERNAME").unwrap_or_else(|| "admin".to_owned()),
            email: lookup("BOOTSTRAP_ADMIN_EMAIL")
                .unwrap_or_else(|| "admin@dressrosa.local".to_owned()),
            full_name: lookup("BOOTSTRAP_ADMIN_FULL_NAME")
                .unwrap_or_else(|| "System Administrator".to_owned()),
            password: lookup("BOOTSTRAP_ADMIN_PASSWORD").filter(|value| !value.is_empty()),
        };

        Ok(Self {
            run_mode,
            environment,
            database_url,
            api_host,
            api_port,
            api_v1_prefix,
            access_token_ttl: Duration::minutes(access_token_minutes),
            session_cookie_name,
            session_cookie_secure,
            bootstrap_admin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(
                env::var("LOG_LEVEL")
                    .unwrap_or_else(|_| "info".to_owned())
                    .to_lowercase(),
            )
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn overlay_file(environment: &str) -> Option<&'static str> {
    match environment {
        "test" => Some(".env.test"),
        "production" => Some(".env.prod"),
        _ => None,
    }
}

fn parse_or<T: FromStr>(name: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn normalize_prefix(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}
