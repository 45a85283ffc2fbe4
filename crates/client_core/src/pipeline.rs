//! In-memory client collection for a session and the stage transitions
//! applied to it.
//!
//! The collection only changes after the backend confirms a write. Transitions,
//! edits and reloads are serialized through one lock held across the remote
//! call, so two moves of the same client cannot interleave.

use std::{collections::BTreeMap, sync::Arc};

use shared::{
    domain::{Client, ClientId, ClientUpdate, StatusTag},
    status::{self, Stage},
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::{gateway::ClientGateway, notifications::Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Target tag is not a pipeline stage; nothing was sent.
    UnknownStatus,
    /// Client id is not in the loaded collection; nothing was sent.
    UnknownClient,
    /// Client already sits in the target stage; nothing was sent.
    Unchanged,
    Moved,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    UnknownClient,
    Failed,
}

/// One board column.
#[derive(Debug, Clone)]
pub struct BoardColumn {
    pub stage: &'static Stage,
    pub clients: Vec<Client>,
}

impl BoardColumn {
    pub fn count(&self) -> usize {
        self.clients.len()
    }
}

pub struct PipelineStateManager {
    gateway: Arc<dyn ClientGateway>,
    notifier: Notifier,
    clients: RwLock<Vec<Client>>,
    writes: Mutex<()>,
}

impl PipelineStateManager {
    pub fn new(gateway: Arc<dyn ClientGateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            clients: RwLock::new(Vec::new()),
            writes: Mutex::new(()),
        }
    }

    /// Replaces the collection with the backend's. On failure the previous
    /// collection stays as it was.
    pub async fn load(&self) -> LoadOutcome {
        let _writes = self.writes.lock().await;
        self.reload().await
    }

    async fn reload(&self) -> LoadOutcome {
        match self.gateway.list_clients().await {
            Ok(fetched) => {
                let count = fetched.len();
                *self.clients.write().await = fetched;
                debug!(count, "clients loaded");
                LoadOutcome::Loaded(count)
            }
            Err(error) => {
                warn!(%error, "failed to load clients");
                self.notifier
                    .error("clients could not be loaded", Some(error.to_string()));
                LoadOutcome::Failed
            }
        }
    }

    pub async fn clients(&self) -> Vec<Client> {
        self.clients.read().await.clone()
    }

    pub async fn client(&self, client_id: ClientId) -> Option<Client> {
        self.clients
            .read()
            .await
            .iter()
            .find(|c| c.id == client_id)
            .cloned()
    }

    pub async fn transition(&self, client_id: ClientId, target: &StatusTag) -> TransitionOutcome {
        let Some(stage) = status::stage(target.as_str()) else {
            debug!(%client_id, %target, "ignoring move to unknown status");
            return TransitionOutcome::UnknownStatus;
        };

        let _writes = self.writes.lock().await;

        let Some(current) = self.client(client_id).await else {
            debug!(%client_id, "ignoring move of unknown client");
            return TransitionOutcome::UnknownClient;
        };
        if current.status == *target {
            return TransitionOutcome::Unchanged;
        }

        match self.gateway.update_status(client_id, target).await {
            Ok(()) => {
                if let Some(client) = self
                    .clients
                    .write()
                    .await
                    .iter_mut()
                    .find(|c| c.id == client_id)
                {
                    client.status = target.clone();
                }
                info!(%client_id, from = %current.status, to = %target, "client moved");
                self.notifier.success(
                    "client moved",
                    Some(format!("{} is now in {}", current.name, stage.label)),
                );
                TransitionOutcome::Moved
            }
            Err(error) => {
                warn!(%client_id, %target, %error, "status write failed");
                self.notifier
                    .error("status could not be updated", Some(error.to_string()));
                TransitionOutcome::Failed
            }
        }
    }

    /// Partition by status tag. Each group keeps the collection's order.
    pub async fn group_by_status(&self) -> BTreeMap<StatusTag, Vec<Client>> {
        let mut groups: BTreeMap<StatusTag, Vec<Client>> = BTreeMap::new();
        for client in self.clients.read().await.iter() {
            groups
                .entry(client.status.clone())
                .or_default()
                .push(client.clone());
        }
        groups
    }

    /// One column per stage in board order, empty ones included. Clients with
    /// an unknown tag have no column.
    pub async fn board_columns(&self) -> Vec<BoardColumn> {
        let mut groups = self.group_by_status().await;
        status::STAGES
            .iter()
            .map(|stage| BoardColumn {
                stage,
                clients: groups
                    .remove(&StatusTag::new(stage.tag))
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Whether processes may be managed for the client. Unknown ids are
    /// refused.
    pub async fn gate(&self, client_id: ClientId) -> bool {
        self.client(client_id)
            .await
            .is_some_and(|c| status::permits_process_management(c.status.as_str()))
    }

    pub async fn edit_client(&self, client_id: ClientId, update: &ClientUpdate) -> EditOutcome {
        let _writes = self.writes.lock().await;

        if self.client(client_id).await.is_none() {
            return EditOutcome::UnknownClient;
        }

        match self.gateway.update_client(client_id, update).await {
            Ok(()) => {
                info!(%client_id, "client updated");
                self.notifier.success("client updated", None);
                self.reload().await;
                EditOutcome::Updated
            }
            Err(error) => {
                warn!(%client_id, %error, "client write failed");
                self.notifier
                    .error("client could not be updated", Some(error.to_string()));
                EditOutcome::Failed
            }
        }
    }

    /// Case-insensitive substring match on name, interest and status (tag or
    /// label). A blank term matches everything.
    pub async fn search(&self, term: &str) -> Vec<Client> {
        let needle = term.trim().to_lowercase();
        let clients = self.clients.read().await;
        if needle.is_empty() {
            return clients.clone();
        }
        clients
            .iter()
            .filter(|c| {
                let entry = status::lookup(c.status.as_str());
                [
                    c.name.as_str(),
                    c.interest.as_str(),
                    c.status.as_str(),
                    entry.label.as_ref(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
