use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::directory::Directory;
use crate::domain::diagnostics::Diagnostics;
use crate::realtime::VetoEventSink;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Match, map pool and team membership lookups
    pub directory: Directory,
    /// Where committed veto transitions are announced
    pub events: Arc<dyn VetoEventSink>,
    pub diagnostics: Diagnostics,
}

impl AppState {
    pub fn new(
        db: Option<DatabaseConnection>,
        directory: Directory,
        events: Arc<dyn VetoEventSink>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            db,
            directory,
            events,
            diagnostics,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    /// Create a test AppState without database connection
    #[cfg(test)]
    pub fn for_tests_without_db() -> Self {
        use crate::directory::InMemoryDirectory;
        use crate::realtime::BroadcastSink;

        Self::new(
            None,
            Directory::in_memory(Arc::new(InMemoryDirectory::new())),
            Arc::new(BroadcastSink::default()),
            Diagnostics::default(),
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("stale_after", &self.diagnostics.stale_after)
            .finish_non_exhaustive()
    }
}
