//! ETag helpers for veto session views.
//!
//! The session `version` is bumped by every mutation, so `(id, version)`
//! identifies one observable state of a veto.

use actix_web::http::header::{HeaderMap, IF_NONE_MATCH};

/// Format: `"veto-{id}-v{version}"` (quoted, as HTTP requires).
pub fn veto_etag(session_id: i64, version: i32) -> String {
    format!(r#""veto-{session_id}-v{version}""#)
}

/// True when `If-None-Match` lists `etag` (or is `*`).
pub fn if_none_match_hits(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|raw| {
            raw.split(',').map(str::trim).any(|candidate| {
                candidate == "*" || candidate == etag || candidate.strip_prefix("W/") == Some(etag)
            })
        })
        .unwrap_or(false)
}
