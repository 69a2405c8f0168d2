use crate::config::AppConfig;
use crate::errors::AppError;
use metrics::{counter, gauge};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbBackend,
    DbErr, IsolationLevel, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

impl DbConfig {
    pub fn from_app_config(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

/// Establishes a connection pool to the database
///
/// # Errors
/// Returns an `AppError` if the connection cannot be established
pub async fn establish_connection(database_url: &str) -> Result<DbPool, AppError> {
    let config = DbConfig {
        url: database_url.to_string(),
        ..Default::default()
    };

    establish_connection_with_config(&config).await
}

/// Establishes a connection pool using the application configuration
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, AppError> {
    establish_connection_with_config(&DbConfig::from_app_config(cfg)).await
}

/// Establishes a connection pool to the database with custom configuration
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, AppError> {
    debug!("Configuring database connection with: {:?}", config);

    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(true);

    gauge!("rentora_db.max_connections", config.max_connections as f64);

    info!(
        "Connecting to database with max_connections={}",
        config.max_connections
    );

    let pool = Database::connect(opt).await.map_err(|e| {
        counter!("rentora_db.connect_failures", 1);
        AppError::DatabaseError(e)
    })?;

    info!("Database connection pool established");
    Ok(pool)
}

/// Runs all pending migrations
pub async fn run_migrations(pool: &DbPool) -> Result<(), AppError> {
    info!("Running database migrations");
    crate::migrator::Migrator::up(pool, None)
        .await
        .map_err(AppError::DatabaseError)?;
    info!("Database migrations completed");
    Ok(())
}

/// Checks database connectivity
pub async fn ping(pool: &DbPool) -> Result<(), AppError> {
    pool.ping().await.map_err(AppError::DatabaseError)
}

/// Begins a transaction with the strongest isolation the backend supports.
///
/// Aggregate mutations (payments, refunds, line-item replacement) must not
/// interleave; SERIALIZABLE closes the read-modify-write race on
/// `amount_paid`. SQLite transactions are serializable already and reject the
/// explicit isolation clause, hence the backend split.
pub async fn begin_serializable(pool: &DbPool) -> Result<DatabaseTransaction, DbErr> {
    match pool.get_database_backend() {
        DbBackend::Postgres | DbBackend::MySql => {
            pool.begin_with_config(Some(IsolationLevel::Serializable), None)
                .await
        }
        _ => pool.begin().await,
    }
}
