use std::{fmt, str::FromStr, sync::Arc};

use tokio::sync::RwLock;
use tracing::warn;

use crate::kv::KeyValueStore;

pub const VIEW_PREFERENCE_KEY: &str = "clients-view-preference";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Board,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Board => "board",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::List => ViewMode::Board,
            ViewMode::Board => ViewMode::List,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view mode '{0}'")]
pub struct UnknownViewMode(pub String);

impl FromStr for ViewMode {
    type Err = UnknownViewMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(ViewMode::List),
            "board" => Ok(ViewMode::Board),
            other => Err(UnknownViewMode(other.to_string())),
        }
    }
}

/// List/board choice for the clients screen, persisted across runs.
pub struct ViewPreferenceStore {
    store: Arc<dyn KeyValueStore>,
    mode: RwLock<ViewMode>,
}

impl ViewPreferenceStore {
    /// Reads the persisted mode. Missing, unreadable or unrecognized values
    /// fall back to [`ViewMode::List`].
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mode = match store.get(VIEW_PREFERENCE_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => ViewMode::default(),
            Err(error) => {
                warn!(%error, "could not read view preference");
                ViewMode::default()
            }
        };
        Self {
            store,
            mode: RwLock::new(mode),
        }
    }

    pub async fn current(&self) -> ViewMode {
        *self.mode.read().await
    }

    pub async fn is_list(&self) -> bool {
        self.current().await == ViewMode::List
    }

    pub async fn is_board(&self) -> bool {
        self.current().await == ViewMode::Board
    }

    pub async fn toggle(&self) -> ViewMode {
        let mut mode = self.mode.write().await;
        *mode = mode.toggled();
        self.persist(*mode).await;
        *mode
    }

    pub async fn set(&self, next: ViewMode) {
        let mut mode = self.mode.write().await;
        *mode = next;
        self.persist(next).await;
    }

    async fn persist(&self, mode: ViewMode) {
        if let Err(error) = self.store.set(VIEW_PREFERENCE_KEY, mode.as_str()).await {
            warn!(%error, %mode, "could not persist view preference");
        }
    }
}

#[cfg(test)]
#[path = "tests/view_preference_tests.rs"]
mod tests;
