//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; repos convert through `From<DbErr>` which
//! lands here. Higher layers map `DomainError` to `AppError`.

use tracing::{error, warn};

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::trace_ctx;

/// Prefix of the structured payload adapters raise when a session row is gone.
pub const SESSION_NOT_FOUND_PREFIX: &str = "SESSION_NOT_FOUND:";
/// Prefix of the structured payload adapters raise on a failed conditional write.
pub const OPTIMISTIC_LOCK_PREFIX: &str = "OPTIMISTIC_LOCK:";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Map a unique violation on one of the veto indexes to its domain meaning.
///
/// SQLite reports the column list (`veto_actions.session_id, veto_actions.map_id`),
/// Postgres reports the index name.
fn map_unique_violation(error_msg: &str) -> Option<DomainError> {
    if error_msg.contains("veto_actions.map_id")
        || error_msg.contains("ux_veto_actions_session_map")
    {
        return Some(DomainError::validation(
            ValidationKind::MapAlreadyActioned,
            "Map has already been banned or picked in this veto",
        ));
    }
    if error_msg.contains("veto_actions.order_number")
        || error_msg.contains("ux_veto_actions_session_order")
    {
        return Some(DomainError::conflict(
            ConflictKind::OptimisticLock,
            "Another action was recorded concurrently; refresh and retry",
        ));
    }
    if error_msg.contains("veto_sessions.match_id")
        || error_msg.contains("ux_veto_sessions_match_id")
    {
        return Some(DomainError::conflict(
            ConflictKind::SessionExists,
            "A veto session already exists for this match",
        ));
    }
    None
}

#[derive(serde::Deserialize)]
struct LockInfo {
    session_id: i64,
    expected: i32,
    actual: i32,
}

/// Translate a `DbErr` into a `DomainError`.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(SESSION_NOT_FOUND_PREFIX) => {
            if let Some(Ok(session_id)) = msg
                .strip_prefix(SESSION_NOT_FOUND_PREFIX)
                .map(str::parse::<i64>)
            {
                warn!(trace_id = %trace_id, session_id, "Veto session not found");
                return DomainError::session_not_found(session_id);
            }
            warn!(trace_id = %trace_id, raw_error = %msg, "Unparseable SESSION_NOT_FOUND payload");
            return DomainError::not_found(NotFoundKind::Session, "Veto session not found");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(OPTIMISTIC_LOCK_PREFIX) => {
            if let Some(Ok(info)) = msg
                .strip_prefix(OPTIMISTIC_LOCK_PREFIX)
                .map(serde_json::from_str::<LockInfo>)
            {
                warn!(
                    trace_id = %trace_id,
                    session_id = info.session_id,
                    expected = info.expected,
                    actual = info.actual,
                    "Optimistic lock conflict detected"
                );
                return DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    format!(
                        "Veto session {} was modified concurrently (expected version {}, actual version {}). Refresh and retry.",
                        info.session_id, info.expected, info.actual
                    ),
                );
            }

            warn!(
                trace_id = %trace_id,
                "Optimistic lock conflict detected (version info unavailable)"
            );
            return DomainError::conflict(
                ConflictKind::OptimisticLock,
                "Veto session was modified by another transaction; please retry",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Unique constraint violation");
        if let Some(mapped) = map_unique_violation(&error_msg) {
            return mapped;
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}
