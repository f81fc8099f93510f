use std::sync::Arc;

use time::Duration;

use crate::config::db::{DbKind, DbProfile};
use crate::directory::{Directory, InMemoryDirectory};
use crate::domain::diagnostics::Diagnostics;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::realtime::{BroadcastSink, VetoEventSink};
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    db: Option<(DbKind, DbProfile)>,
    directory: Option<Directory>,
    events: Option<Arc<dyn VetoEventSink>>,
    diagnostics: Diagnostics,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            db: None,
            directory: None,
            events: None,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn with_db(mut self, kind: DbKind, profile: DbProfile) -> Self {
        self.db = Some((kind, profile));
        self
    }

    pub fn with_directory(mut self, directory: Directory) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn VetoEventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.diagnostics = Diagnostics::new(stale_after);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let db = match self.db {
            // single entrypoint: connect + migrate
            Some((kind, profile)) => Some(bootstrap_db(kind, profile).await?),
            None => None,
        };
        let directory = self
            .directory
            .unwrap_or_else(|| Directory::in_memory(Arc::new(InMemoryDirectory::new())));
        let events = self
            .events
            .unwrap_or_else(|| Arc::new(BroadcastSink::default()));

        Ok(AppState::new(db, directory, events, self.diagnostics))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
