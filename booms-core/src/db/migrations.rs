//! Embeds the SQL migrations directory into the binary so every BOOMS
//! service can bring a fresh database up to date on startup without a
//! separate `diesel migration run` step.

use diesel_async::AsyncPgConnection;
use diesel_async_migrations::{embed_migrations, EmbeddedMigrations};

static MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub async fn run_pending(conn: &mut AsyncPgConnection) -> anyhow::Result<()> {
    MIGRATIONS.run_pending_migrations(conn).await?;
    Ok(())
}
