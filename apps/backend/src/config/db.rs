use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Which database engine backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite_file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!(
                "Unknown VETO_DB value '{other}'; expected postgres, sqlite-file or sqlite-memory"
            ))),
        }
    }
}

/// Database profile for different environments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProfile {
    Prod,
    /// Test profile - database name must end with `_test`
    Test,
}

/// Database owner enum for different access levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application-level access (limited permissions)
    App,
    /// Owner-level access (full permissions for migrations)
    Owner,
}

/// Engine selected by `VETO_DB`, defaulting to Postgres.
pub fn db_kind_from_env() -> Result<DbKind, AppError> {
    match env::var("VETO_DB") {
        Ok(raw) => raw.parse(),
        Err(_) => Ok(DbKind::Postgres),
    }
}

/// Build a connection URL from the process environment.
pub fn db_url(kind: DbKind, profile: DbProfile, owner: DbOwner) -> Result<String, AppError> {
    db_url_with(kind, profile, owner, |name| env::var(name).ok())
}

/// Build a connection URL from an arbitrary variable lookup.
pub fn db_url_with<F>(
    kind: DbKind,
    profile: DbProfile,
    owner: DbOwner,
    lookup: F,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match kind {
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
        DbKind::SqliteFile => {
            let path = lookup("SQLITE_PATH").unwrap_or_else(|| match profile {
                DbProfile::Prod => "veto.sqlite".to_string(),
                DbProfile::Test => "veto_test.sqlite".to_string(),
            });
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
        DbKind::Postgres => {
            let host = lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string());
            let port = lookup("POSTGRES_PORT").unwrap_or_else(|| "5432".to_string());
            let db_name = db_name(profile, &lookup)?;
            let (username, password) = credentials(owner, &lookup)?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
    }
}

fn db_name<F>(profile: DbProfile, lookup: &F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match profile {
        DbProfile::Prod => must_var("PROD_DB", lookup),
        DbProfile::Test => {
            let db_name = must_var("TEST_DB", lookup)?;
            if !db_name.ends_with("_test") {
                return Err(AppError::config(format!(
                    "Test profile requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
    }
}

fn credentials<F>(owner: DbOwner, lookup: &F) -> Result<(String, String), AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match owner {
        DbOwner::App => Ok((
            must_var("APP_DB_USER", lookup)?,
            must_var("APP_DB_PASSWORD", lookup)?,
        )),
        DbOwner::Owner => Ok((
            must_var("VETO_OWNER_USER", lookup)?,
            must_var("VETO_OWNER_PASSWORD", lookup)?,
        )),
    }
}

fn must_var<F>(name: &str, lookup: &F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .ok_or_else(|| {
            AppError::config(format!("Required environment variable '{name}' is not set"))
        })
}
