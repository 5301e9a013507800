//! Pool-level health reporting, following the indexer's `HealthMonitor`
//! shape: a point-in-time snapshot rather than a long-running task.

use crate::connection::Database;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub database_reachable: bool,
    pub pool: PoolStats,
}

pub struct HealthMonitor<'a> {
    db: &'a Database,
}

impl<'a> HealthMonitor<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn check(&self) -> HealthReport {
        let pool = self.db.pool();
        HealthReport {
            database_reachable: self.db.health_check().await,
            pool: PoolStats {
                size: pool.size(),
                idle: pool.num_idle(),
            },
        }
    }
}
