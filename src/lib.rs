pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod infrastructure;
pub mod schema;

#[cfg(test)]
mod test_support;

use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub use application::order_service::OrderService;
pub use config::StoreConfig;
pub use db::{create_pool, DbPool};
pub use domain::errors::DomainError;
pub use domain::order::{Delivery, Item, Order, Payment};
pub use errors::AppError;
pub use infrastructure::errors::{Stage, StoreError};
pub use infrastructure::order_cache::OrderCache;
pub use infrastructure::order_repo::DieselOrderStore;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), AppError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| AppError::Migrations(e.to_string()))?;
    log::info!("applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Open a pool for `config` and bring its schema up to date.
///
/// The pool is closed when the last clone is dropped.
pub fn connect(config: &StoreConfig) -> Result<DbPool, AppError> {
    let pool = create_pool(config)?;
    run_migrations(&pool)?;
    Ok(pool)
}
