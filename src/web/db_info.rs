//! `/db/check` and `/db/version`: database diagnostics over the same probe
//! as readiness, with the same two second budget.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;

use crate::error::api::ApiError;
use crate::web::health::{within_budget, ReadinessProbe};
use crate::web::response::{ok, Envelope};

#[derive(Debug, Serialize)]
pub struct DbCheck {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct DbVersion {
    pub version: String,
}

pub async fn check(
    State(probe): State<Arc<dyn ReadinessProbe>>,
) -> Result<Json<Envelope<DbCheck>>, ApiError> {
    within_budget(probe.check()).await.map_err(|e| {
        warn!(error = %e, "db check failed");
        ApiError::service_unavailable("DB_CHECK_FAIL", "database check failed")
    })?;
    Ok(ok(DbCheck { ok: true }))
}

pub async fn version(
    State(probe): State<Arc<dyn ReadinessProbe>>,
) -> Result<Json<Envelope<DbVersion>>, ApiError> {
    let version = within_budget(probe.version()).await.map_err(|e| {
        warn!(error = %e, "db version failed");
        ApiError::service_unavailable("DB_VERSION_FAIL", "cannot read database version")
    })?;
    Ok(ok(DbVersion { version }))
}
