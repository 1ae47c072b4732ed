//! Connection pooling, configuration, and migrations for the SQLite database.

use log::{error, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use diesel::connection::{Connection, SimpleConnection};
use diesel::r2d2::{self, ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use ledger_routing_core::errors::{DatabaseError, Error, Result};

use crate::errors::IntoCore;

pub mod write_actor;
pub use write_actor::{spawn_writer, WriteHandle};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// File name of the database inside the application data directory.
pub const DB_FILE_NAME: &str = "routing.db";

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const POOL_SIZE_ENV: &str = "DATABASE_POOL_SIZE";
pub const BUSY_TIMEOUT_ENV: &str = "DATABASE_BUSY_TIMEOUT_MS";

const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 30_000;

/// Settings for opening the routing database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_path: String,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
}

impl DbConfig {
    pub fn new(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Builds the configuration from the environment.
    ///
    /// `DATABASE_URL` overrides the database location; otherwise the file lives
    /// in `app_data_dir`. Pool size and busy timeout fall back to defaults when
    /// their variables are unset.
    pub fn from_env(app_data_dir: &str) -> Result<Self> {
        let mut config = Self::new(get_db_path(app_data_dir));

        if let Some(pool_size) = read_env_number::<u32>(POOL_SIZE_ENV)? {
            if pool_size == 0 {
                return Err(Error::InvalidConfigValue(format!(
                    "{} must be greater than zero",
                    POOL_SIZE_ENV
                )));
            }
            config.pool_size = pool_size;
        }
        if let Some(busy_timeout_ms) = read_env_number::<u64>(BUSY_TIMEOUT_ENV)? {
            config.busy_timeout_ms = busy_timeout_ms;
        }

        Ok(config)
    }
}

fn read_env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            Error::InvalidConfigValue(format!("{} is not a valid number: '{}'", name, raw))
        }),
        Err(_) => Ok(None),
    }
}

/// Prepares the database file: creates its directory and switches it to WAL.
pub fn init(config: &DbConfig) -> Result<()> {
    let db_path = Path::new(&config.database_path);

    if let Some(db_dir) = db_path.parent() {
        if !db_dir.as_os_str().is_empty() && !db_dir.exists() {
            fs::create_dir_all(db_dir).into_core()?;
        }
    }

    let mut conn = SqliteConnection::establish(&config.database_path).into_core()?;
    conn.batch_execute(&format!(
        "
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = {};
            PRAGMA synchronous  = NORMAL;
        ",
        config.busy_timeout_ms
    ))
    .into_core()?;

    info!("Database initialized at {}", config.database_path);
    Ok(())
}

pub fn create_pool(config: &DbConfig) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(config.database_path.as_str());
    let pool = r2d2::Pool::builder()
        .max_size(config.pool_size)
        .min_idle(Some(1)) // Keep at least one connection ready
        .connection_timeout(Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
        }))
        .build(manager)
        .map_err(|e| Error::Database(DatabaseError::PoolCreationFailed(e.to_string())))?;

    Ok(Arc::new(pool))
}

pub fn run_migrations(pool: &DbPool) -> Result<()> {
    info!("Running database migrations");
    let mut connection = get_connection(pool)?;

    let result = connection.run_pending_migrations(MIGRATIONS).map_err(|e| {
        error!("Database migration failed: {}", e);
        Error::Database(DatabaseError::MigrationFailed(e.to_string()))
    })?;

    if result.is_empty() {
        info!("No pending migrations to apply.");
    } else {
        info!("Applied the following migrations:");
        for migration_version in &result {
            info!("  - {}", migration_version);
        }
    }

    Ok(())
}

pub fn get_db_path(app_data_dir: &str) -> String {
    std::env::var(DATABASE_URL_ENV).unwrap_or_else(|_| {
        Path::new(app_data_dir)
            .join(DB_FILE_NAME)
            .to_string_lossy()
            .into_owned()
    })
}

/// Gets a connection from the pool
pub fn get_connection(pool: &Pool<ConnectionManager<SqliteConnection>>) -> Result<DbConnection> {
    pool.get().into_core()
}

#[derive(Debug)]
struct ConnectionCustomizer {
    busy_timeout_ms: u64,
}

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "
                PRAGMA foreign_keys = ON;
                PRAGMA busy_timeout = {};
                PRAGMA synchronous = NORMAL;
            ",
            self.busy_timeout_ms
        ))
        .map_err(r2d2::Error::QueryError)
    }
}
