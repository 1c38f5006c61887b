//! Connection pooling, following the teacher's `ArcDbPool` shape:
//! a `bb8`-pooled `diesel-async` connection wrapped in an `Arc` so it
//! can be cloned cheaply into every pipeline and background task.

use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use std::sync::Arc;

pub type DbPool = Pool<AsyncPgConnection>;
pub type ArcDbPool = Arc<DbPool>;
pub type DbConn<'a> = PooledConnection<'a, AsyncPgConnection>;

pub async fn new_pool(database_url: &str, max_size: u32) -> anyhow::Result<ArcDbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    let pool = Pool::builder().max_size(max_size).build(manager).await?;
    Ok(Arc::new(pool))
}
