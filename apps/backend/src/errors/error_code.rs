//! Error codes for the veto service API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in problem+json responses.

use core::fmt;

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Veto protocol
    /// Acting team is not the team whose turn it is
    NotYourTurn,
    /// Operation not allowed in the session's current status
    WrongPhase,
    /// Map already banned or picked in this session
    MapAlreadyActioned,
    /// Dice already rolled for this session
    AlreadyRolled,
    /// Acting user's team is not one of the two match teams
    NotAParticipant,
    /// Only the home team may choose a side
    NotHomeTeam,
    /// Map is not part of the session's pool
    UnknownMap,
    /// Tournament map pool cannot run the requested format
    InvalidMapPool,
    /// Unsupported match format
    InvalidFormat,
    /// Rollback requested on an empty ledger
    NoActionsToRollback,

    // Request validation
    /// Invalid session or match id in the path
    InvalidId,
    /// Invalid or missing HTTP header
    InvalidHeader,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    SessionNotFound,
    MatchNotFound,
    MapPoolNotFound,
    /// Generic record not found (DB-driven)
    RecordNotFound,
    NotFound,

    // Conflicts
    /// Session row changed between read and conditional write
    OptimisticLock,
    /// A session already exists for this match
    SessionExists,
    /// Unique constraint violation without a more specific mapping
    UniqueViolation,
    /// Generic conflict
    Conflict,

    // System
    DbError,
    DbUnavailable,
    DbTimeout,
    /// Tournament directory unreachable or misbehaving
    UpstreamUnavailable,
    DataCorruption,
    ConfigError,
    InternalError,
}

impl ErrorCode {
    /// Canonical SCREAMING_SNAKE_CASE string for this code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::WrongPhase => "WRONG_PHASE",
            Self::MapAlreadyActioned => "MAP_ALREADY_ACTIONED",
            Self::AlreadyRolled => "ALREADY_ROLLED",
            Self::NotAParticipant => "NOT_A_PARTICIPANT",
            Self::NotHomeTeam => "NOT_HOME_TEAM",
            Self::UnknownMap => "UNKNOWN_MAP",
            Self::InvalidMapPool => "INVALID_MAP_POOL",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::NoActionsToRollback => "NO_ACTIONS_TO_ROLLBACK",

            Self::InvalidId => "INVALID_ID",
            Self::InvalidHeader => "INVALID_HEADER",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::MatchNotFound => "MATCH_NOT_FOUND",
            Self::MapPoolNotFound => "MAP_POOL_NOT_FOUND",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::SessionExists => "SESSION_EXISTS",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
