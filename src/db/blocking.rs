use std::sync::Arc;

use anyhow::Context;

use crate::db::port::Db;

/// Runs `f` against `db` on tokio's blocking pool.
///
/// The [`Db`] port is synchronous; async callers go through here so a slow
/// query never stalls a runtime worker. A panicking or cancelled task
/// surfaces as an `anyhow` error converted into `E`.
pub async fn run_blocking<T, E, F>(db: &Arc<dyn Db>, f: F) -> Result<T, E>
where
    T: Send + 'static,
    E: From<anyhow::Error> + Send + 'static,
    F: FnOnce(&dyn Db) -> Result<T, E> + Send + 'static,
{
    let db = db.clone();
    tokio::task::spawn_blocking(move || f(db.as_ref()))
        .await
        .context("database task failed")?
}
