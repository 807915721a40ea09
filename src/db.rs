use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};

use crate::error::ApiError;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type DbConn = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder()
        .build(manager)
        .expect("Failed to create database pool")
}

pub fn get_conn(pool: &DbPool) -> Result<DbConn, ApiError> {
    Ok(pool.get()?)
}
