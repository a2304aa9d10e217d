//! Liveness and readiness endpoints.
//!
//! Liveness only proves the process answers. Readiness runs a
//! [`ReadinessProbe`] (a `SELECT 1` in production) with a two second budget.
//! The same probe backs the `/db/check` and `/db/version` endpoints.

use std::{future::Future, sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;

use crate::db::blocking::run_blocking;
use crate::db::port::Db;
use crate::error::api::ApiError;
use crate::web::response::{ok, Envelope};

const READY_TIMEOUT: Duration = Duration::from_secs(2);

#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn check(&self) -> Result<()>;

    /// Server version string as reported by the database.
    async fn version(&self) -> Result<String>;
}

/// Readiness backed by a round trip to the database.
pub struct DbReadiness {
    db: Arc<dyn Db>,
}

impl DbReadiness {
    pub fn new(db: Arc<dyn Db>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReadinessProbe for DbReadiness {
    async fn check(&self) -> Result<()> {
        run_blocking(&self.db, |db| db.fetch_one("SELECT 1 AS ok", &[]).map(|_| ())).await
    }

    async fn version(&self) -> Result<String> {
        run_blocking(&self.db, |db| match db.fetch_one("SELECT VERSION() AS version", &[])? {
            Some(row) => row.get_string("version"),
            None => Err(anyhow::anyhow!("VERSION() returned no row")),
        })
        .await
    }
}

/// Runs a probe call under the readiness budget.
pub(crate) async fn within_budget<T>(call: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(READY_TIMEOUT, call).await {
        Ok(res) => res,
        Err(_) => Err(anyhow::anyhow!("database probe timed out")),
    }
}

#[derive(Debug, Serialize)]
pub struct Alive {
    pub alive: bool,
}

#[derive(Debug, Serialize)]
pub struct Ready {
    pub ready: bool,
}

pub async fn live() -> Json<Envelope<Alive>> {
    ok(Alive { alive: true })
}

pub async fn ready(
    State(probe): State<Arc<dyn ReadinessProbe>>,
) -> Result<Json<Envelope<Ready>>, ApiError> {
    match within_budget(probe.check()).await {
        Ok(()) => Ok(ok(Ready { ready: true })),
        Err(e) => {
            warn!(error = %e, "not ready");
            Err(ApiError::service_unavailable("DB_NOT_READY", "database is not ready"))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::db::port::{Row, Value};

    /// Probe with a fixed answer.
    pub(crate) struct StaticProbe(pub bool);

    #[async_trait]
    impl ReadinessProbe for StaticProbe {
        async fn check(&self) -> Result<()> {
            if self.0 {
                Ok(())
            } else {
                Err(anyhow::anyhow!("connection refused"))
            }
        }

        async fn version(&self) -> Result<String> {
            self.check().await.map(|()| "8.0.36".to_string())
        }
    }

    pub(crate) struct HangingProbe;

    #[async_trait]
    impl ReadinessProbe for HangingProbe {
        async fn check(&self) -> Result<()> {
            std::future::pending::<()>().await;
            Ok(())
        }

        async fn version(&self) -> Result<String> {
            std::future::pending::<()>().await;
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn ready_when_probe_passes() {
        let Json(body) = ready(State(Arc::new(StaticProbe(true)) as Arc<dyn ReadinessProbe>))
            .await
            .unwrap();

        assert!(body.data.ready);
    }

    #[tokio::test]
    async fn not_ready_when_probe_fails() {
        let err = ready(State(Arc::new(StaticProbe(false)) as Arc<dyn ReadinessProbe>))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code, "DB_NOT_READY");
    }

    struct VersionDb;

    impl Db for VersionDb {
        fn fetch_one(&self, sql: &str, _params: &[crate::db::port::Param]) -> Result<Option<Row>> {
            let mut row = Row::default();
            if sql.contains("VERSION()") {
                row.insert("version", Value::Str("8.0.36".into()));
            }
            Ok(Some(row))
        }

        fn fetch_all(&self, _sql: &str, _params: &[crate::db::port::Param]) -> Result<Vec<Row>> {
            Ok(Vec::new())
        }

        fn exec(&self, _sql: &str, _params: &[crate::db::port::Param]) -> Result<u64> {
            Ok(0)
        }

        fn exec_returning_last_insert_id(
            &self,
            _sql: &str,
            _params: &[crate::db::port::Param],
        ) -> Result<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn db_readiness_reads_version() {
        let probe = DbReadiness::new(Arc::new(VersionDb));

        probe.check().await.unwrap();
        assert_eq!(probe.version().await.unwrap(), "8.0.36");
    }

    #[tokio::test]
    async fn hanging_probe_times_out() {
        let err = ready(State(Arc::new(HangingProbe) as Arc<dyn ReadinessProbe>))
            .await
            .unwrap_err();

        assert_eq!(err.code, "DB_NOT_READY");
    }
}
