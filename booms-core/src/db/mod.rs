pub mod locking;
pub mod migrations;
pub mod pool;
pub mod schema;

pub use pool::{new_pool, ArcDbPool, DbConn, DbPool};
