use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database as SeaDatabase};

use crate::database::Database;

pub async fn test_db() -> Arc<Database> {
    // A single pooled connection, every connection to `:memory:` is its own database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = SeaDatabase::connect(opt).await.unwrap();

    migration::Migrator::up(&conn, None)
        .await
        .unwrap_or_else(|e| panic!("Failed to run migrations: {}", e));

    Arc::new(Database { conn })
}
