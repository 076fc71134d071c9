//! Environment-supplied configuration.

/// Deployment mode. Gates the `stack` field of the terminal error envelope
/// and the client-side request logging.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }

    /// `APP_ENV`, default development.
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV") {
            Ok(v) if v.eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Server configuration, all supplied externally via environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// `PORT`, default 5000.
    pub port: u16,
    /// `APP_ENV`, default development.
    pub environment: Environment,
    /// `CORS_ORIGIN` — the single allowed cross-origin client address.
    pub cors_origin: String,
    /// `DATABASE_URL` — selects the Postgres store when set (and the
    /// `postgres` feature is enabled).
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("PORT={raw} is not a valid port; using 5000");
                5000
            }),
            Err(_) => 5000,
        };

        Self {
            port,
            environment: Environment::from_env(),
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }
}
