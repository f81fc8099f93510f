use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Header the upstream auth gateway sets to the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user performing a veto move, as asserted by the auth gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser(pub i64);

impl ActingUser {
    pub fn id(&self) -> i64 {
        self.0
    }
}

fn parse_user_id(req: &HttpRequest) -> Result<ActingUser, AppError> {
    let raw = req
        .headers()
        .get(USER_ID_HEADER)
        .ok_or_else(|| {
            AppError::bad_request(ErrorCode::InvalidHeader, "Missing X-User-Id header")
        })?
        .to_str()
        .map_err(|_| {
            AppError::bad_request(ErrorCode::InvalidHeader, "X-User-Id header is not ASCII")
        })?;

    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(ActingUser(id)),
        _ => Err(AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid X-User-Id header: {raw}"),
        )),
    }
}

impl FromRequest for ActingUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_user_id(req))
    }
}
