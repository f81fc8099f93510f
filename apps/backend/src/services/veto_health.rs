//! Read-only health scanning over stored sessions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::domain::diagnostics::{Diagnostics, HealthReport};
use crate::error::AppError;
use crate::repos::{actions, sessions};

#[derive(Debug, Default, Clone, Copy)]
pub struct VetoHealthService {
    diagnostics: Diagnostics,
}

impl VetoHealthService {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    pub async fn scan<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        session_id: i64,
        now: OffsetDateTime,
    ) -> Result<HealthReport, AppError> {
        let session = sessions::require_session(conn, session_id).await?;
        let ledger = actions::list_for_session(conn, session_id).await?;
        let report = self.diagnostics.scan(&session, &ledger, now);
        debug!(session_id, issues = report.issues.len(), "Veto session scanned");
        Ok(report)
    }

    /// Scan every session that is not completed.
    pub async fn scan_active<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        now: OffsetDateTime,
    ) -> Result<Vec<HealthReport>, AppError> {
        let active = sessions::list_active(conn).await?;
        let mut reports = Vec::with_capacity(active.len());
        for session in active {
            let ledger = actions::list_for_session(conn, session.id).await?;
            reports.push(self.diagnostics.scan(&session, &ledger, now));
        }

        let unhealthy = reports.iter().filter(|r| !r.is_healthy()).count();
        let stuck = reports.iter().filter(|r| r.is_stuck).count();
        info!(
            scanned = reports.len(),
            unhealthy, stuck, "Active veto sessions scanned"
        );
        Ok(reports)
    }
}
