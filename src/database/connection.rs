use std::fs;
use std::path::Path;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use url::Url;

use crate::config::{DatabaseTarget, Settings};
use crate::error::{Error, Result};

/// Connection string for a configured target.
pub fn connection_string(target: &DatabaseTarget) -> Result<String> {
    match target {
        DatabaseTarget::Memory => Ok("sqlite::memory:".to_string()),
        DatabaseTarget::Url(url) => Ok(url.clone()),
        DatabaseTarget::File(path) => file_connection_string(path),
    }
}

/// Builds `sqlite:<path>?mode=rwc` through `url` so the path is escaped.
fn file_connection_string(path: &Path) -> Result<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| Error::Config(format!("unable to resolve working directory: {}", e)))?
            .join(path)
    };
    let db_url = Url::from_file_path(&absolute)
        .map_err(|_| Error::Config(format!("invalid database path: {}", absolute.display())))?;
    Ok(format!("sqlite:{}?mode=rwc", db_url.path()))
}

/// Make sure the directory holding a database file exists
fn ensure_db_dir_exists(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::Config(format!(
                "unable to create database directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Establish a SeaORM database connection.
pub async fn establish_connection(settings: &Settings) -> Result<DatabaseConnection> {
    if let DatabaseTarget::File(path) = &settings.database {
        if path.exists() {
            log::info!("using database: {}", path.display());
        } else {
            ensure_db_dir_exists(path)?;
            log::info!("creating database: {}", path.display());
        }
    }

    let mut options = ConnectOptions::new(connection_string(&settings.database)?);
    options
        .max_connections(settings.max_connections)
        .min_connections(1)
        .connect_timeout(settings.connect_timeout)
        .sqlx_logging(false);

    Ok(Database::connect(options).await?)
}

/// Connect and bring the schema up to date.
pub async fn open_database(settings: &Settings) -> Result<DatabaseConnection> {
    let conn = establish_connection(settings).await?;
    log::info!("running database migrations...");
    Migrator::up(&conn, None).await?;
    log::info!("database migrations complete");
    Ok(conn)
}

/// Close the database connection
pub async fn close_connection(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    Ok(())
}
