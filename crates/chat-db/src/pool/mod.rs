//! Database connection pool management

mod postgres;

pub use postgres::{check_health, create_pool, run_migrations, PoolSettings};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
