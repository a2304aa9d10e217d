//! # Database Configuration and Pool Factory
//!
//! Provides database connection configuration (`DbConfig`) and a helper
//! to create a reusable MySQL connection pool (`DbPool`).
//!
//! The connection URL and maximum pool size are loaded from
//! environment variables (`DATABASE_URL`, `DATABASE_MAX_CONN`).

use std::{env, sync::Arc};

use anyhow::Context;
use mysql::{Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts};

/// Database connection configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DbConfig {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

impl DbConfig {
    /// Builds a [`DbConfig`] from environment variables.
    pub fn from_env() -> Self {
        let url = env::var("DATABASE_URL").ok();
        let max_connections = env::var("DATABASE_MAX_CONN")
            .ok()
            .and_then(|s| s.parse::<u32>().ok());
        Self {
            url,
            max_connections,
        }
    }

    /// Returns the connection URL with any password replaced by `***`.
    pub fn redacted_url(&self) -> String {
        let Some(url) = self.url.as_deref() else {
            return "<unset>".into();
        };
        match (url.find("://"), url.rfind('@')) {
            (Some(scheme), Some(at)) if at > scheme => {
                let creds = &url[scheme + 3..at];
                let user = creds.split(':').next().unwrap_or_default();
                format!("{}{}:***{}", &url[..scheme + 3], user, &url[at..])
            }
            _ => url.to_string(),
        }
    }
}

/// Shared database pool type alias (`Arc<mysql::Pool>`).
pub type DbPool = Arc<Pool>;

/// Statement run on every new pooled connection.
///
/// `DATETIME` columns are read back as UTC, so the session zone must be UTC
/// for `CURRENT_TIMESTAMP` defaults to agree.
pub const SESSION_INIT: &str = "SET time_zone = '+00:00'";

/// Builds driver options: URL, pool size and the UTC session init.
fn pool_opts(cfg: &DbConfig) -> anyhow::Result<Opts> {
    let url = cfg
        .url
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
    let opts = Opts::from_url(url).context("invalid DATABASE_URL")?;

    let mut builder = OptsBuilder::from_opts(opts).init(vec![SESSION_INIT]);
    if let Some(max) = cfg.max_connections {
        let max = (max as usize).max(1);
        let constraints = PoolConstraints::new(1, max)
            .ok_or_else(|| anyhow::anyhow!("invalid DATABASE_MAX_CONN: {max}"))?;
        builder = builder.pool_opts(PoolOpts::default().with_constraints(constraints));
    }
    Ok(builder.into())
}

/// Creates a new [`DbPool`] using the given configuration.
///
/// # Errors
/// Returns an error if:
/// - `DATABASE_URL` is missing
/// - the URL is invalid
/// - the pool cannot be created
pub fn create_pool(cfg: &DbConfig) -> anyhow::Result<DbPool> {
    let pool = Pool::new(pool_opts(cfg)?).context("failed to create MySQL pool")?;
    Ok(Arc::new(pool))
}
