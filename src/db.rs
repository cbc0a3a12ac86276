use migration::Migrator;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;

use crate::error::AppResult;

const PRAGMAS: &[&str] = &["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];

pub async fn connect_and_migrate(options: impl Into<ConnectOptions>) -> AppResult<DatabaseConnection> {
    let db = Database::connect(options).await?;

    for pragma in PRAGMAS {
        db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string())).await?;
    }

    Migrator::up(&db, None).await?;
    tracing::debug!("migrations applied");
    Ok(db)
}

/// Fresh in-memory database with the full schema and seeded reference data.
#[cfg(test)]
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    // every pooled connection would otherwise open its own empty database
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// File-backed database under `dir` whose pool hands out several connections,
/// so concurrent operations really run side by side.
#[cfg(test)]
pub async fn test_file_db(dir: &std::path::Path) -> DatabaseConnection {
    let url = format!("sqlite://{}?mode=rwc", dir.join("netmovies.db").display());
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(8).sqlx_logging(false);

    connect_and_migrate(opts).await.unwrap()
}
