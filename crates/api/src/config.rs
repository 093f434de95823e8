use crate::auth::jwt::JwtConfig;

/// Default bound on concurrent notification sends per request.
const DEFAULT_NOTIFICATION_CONCURRENCY: usize = 4;

/// Server configuration loaded from environment variables.
///
/// Server ambient settings have defaults suitable for local development.
/// The database URL, JWT secret and site URL must be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Postgres connection string.
    pub database_url: String,
    /// JWT verification settings.
    pub jwt: JwtConfig,
    /// Public base URL of the planner UI, used for shareable campaign links.
    pub site_url: String,
    /// Upper bound on notification emails in flight for one request.
    pub notification_concurrency: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `DATABASE_URL`             | **required**               |
    /// | `SITE_URL`                 | **required**               |
    /// | `NOTIFICATION_CONCURRENCY` | `4`                        |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let site_url = std::env::var("SITE_URL").expect("SITE_URL must be set");
        assert!(!site_url.trim().is_empty(), "SITE_URL must not be empty");

        let notification_concurrency: usize = std::env::var("NOTIFICATION_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_NOTIFICATION_CONCURRENCY.to_string())
            .parse()
            .expect("NOTIFICATION_CONCURRENCY must be a valid usize");
        assert!(
            notification_concurrency > 0,
            "NOTIFICATION_CONCURRENCY must be at least 1"
        );

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            jwt,
            site_url,
            notification_concurrency,
        }
    }
}
