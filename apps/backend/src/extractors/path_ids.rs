use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;

fn positive_path_id(req: &HttpRequest, name: &str) -> Result<i64, AppError> {
    let raw = req.match_info().get(name).ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidId, format!("Missing {name} parameter"))
    })?;

    let id = raw.parse::<i64>().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidId, format!("Invalid {name}: {raw}"))
    })?;

    if id <= 0 {
        return Err(AppError::bad_request(
            ErrorCode::InvalidId,
            format!("{name} must be positive, got: {id}"),
        ));
    }
    Ok(id)
}

/// Veto session id from the `{session_id}` path segment.
///
/// Existence is checked by the service inside the request transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub i64);

impl FromRequest for SessionId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(positive_path_id(req, "session_id").map(SessionId))
    }
}

/// Match id from the `{match_id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchId(pub i64);

impl FromRequest for MatchId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(positive_path_id(req, "match_id").map(MatchId))
    }
}
