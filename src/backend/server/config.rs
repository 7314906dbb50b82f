/**
 * Server Configuration
 *
 * Loads server configuration from environment variables with sensible
 * defaults for local development, and initializes the optional PostgreSQL
 * connection pool.
 *
 * # Configuration Sources
 *
 * - `SERVER_PORT` - listen port (default 3000)
 * - `DATABASE_URL` - PostgreSQL connection string; when unset the server
 *   runs with in-memory stores
 * - `JWT_SECRET` - HS256 signing secret (min 32 bytes)
 * - `JWT_EXPIRATION_SECS` - token lifetime (default 30 days)
 * - `WS_ALLOW_ANONYMOUS` - whether the connection gate admits
 *   credential-less WebSocket connections (default true)
 *
 * # Error Handling
 *
 * Database errors are logged but do not prevent startup; the server
 * continues with in-memory stores. A weak JWT secret, by contrast, fails
 * startup in `create_app`.
 */

use sqlx::PgPool;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_JWT_EXPIRATION_SECS: u64 = 30 * 24 * 60 * 60;

pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub ws_allow_anonymous: bool,
}

impl ServerConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Self {
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_url = std::env::var("DATABASE_URL").ok();
        if database_url.is_none() {
            tracing::warn!("DATABASE_URL not set. Falling back to in-memory stores.");
        }

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development default");
            "change-me-development-only-jwt-secret".to_string()
        });

        let jwt_expiration_secs = std::env::var("JWT_EXPIRATION_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_JWT_EXPIRATION_SECS);

        let ws_allow_anonymous = std::env::var("WS_ALLOW_ANONYMOUS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        Self {
            port,
            database_url,
            jwt_secret,
            jwt_expiration_secs,
            ws_allow_anonymous,
        }
    }
}

/// Create the database connection pool and run migrations.
///
/// Returns `None` when no `DATABASE_URL` is configured or the connection
/// fails; the server then runs on in-memory stores.
pub async fn load_database(config: &ServerConfig) -> Option<PgPool> {
    let database_url = config.database_url.as_ref()?;

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {e}");
            tracing::warn!("Continuing with in-memory stores.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed"),
        Err(e) => {
            // Migrations may already be applied by another instance.
            tracing::error!("Failed to run database migrations: {e}");
            tracing::warn!("Continuing - database schema might not be up to date");
        }
    }

    Some(pool)
}
