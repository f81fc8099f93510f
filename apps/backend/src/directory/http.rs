use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use super::{MapPoolProvider, MatchInfo, MatchProvider, TeamMembership};
use crate::errors::domain::{DomainError, InfraErrorKind};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Directory backed by the tournament application's REST API.
///
/// Paths, relative to the base URL:
/// - `GET /matches/{match_id}` -> [`MatchInfo`]
/// - `GET /tournaments/{tournament_id}/map-pool` -> `{ "map_ids": [...] }`
/// - `GET /users/{user_id}/team` -> `{ "team_id": 1 | null }`
///
/// A 404 means "not found" and becomes `Ok(None)`.
#[derive(Clone, Debug)]
pub struct HttpDirectory {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct MapPoolBody {
    map_ids: Vec<String>,
}

#[derive(Deserialize)]
struct TeamBody {
    team_id: Option<i64>,
}

fn upstream(detail: String) -> DomainError {
    DomainError::infra(InfraErrorKind::Upstream, detail)
}

impl HttpDirectory {
    pub fn new(base_url: &str) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| upstream(format!("failed to build directory client: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, DomainError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::infra(InfraErrorKind::Timeout, format!("directory timed out: {url}"))
            } else {
                upstream(format!("directory request failed: {e}"))
            }
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            warn!(%url, %status, "directory returned an error status");
            return Err(upstream(format!("directory returned {status} for {url}")));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| upstream(format!("directory response unreadable: {e}")))
    }
}

#[async_trait]
impl MatchProvider for HttpDirectory {
    async fn find_match(&self, match_id: i64) -> Result<Option<MatchInfo>, DomainError> {
        self.get_json(&format!("/matches/{match_id}")).await
    }
}

#[async_trait]
impl MapPoolProvider for HttpDirectory {
    async fn map_pool(&self, tournament_id: i64) -> Result<Option<Vec<String>>, DomainError> {
        let body: Option<MapPoolBody> = self
            .get_json(&format!("/tournaments/{tournament_id}/map-pool"))
            .await?;
        Ok(body.map(|b| b.map_ids))
    }
}

#[async_trait]
impl TeamMembership for HttpDirectory {
    async fn team_of(&self, user_id: i64) -> Result<Option<i64>, DomainError> {
        let body: Option<TeamBody> = self.get_json(&format!("/users/{user_id}/team")).await?;
        Ok(body.and_then(|b| b.team_id))
    }
}
