use std::sync::Arc;

use shared::{
    domain::{Client, ClientId, Jurisdiction, ProcessId},
    error::ErrorCode,
    process::{form_schema, FieldValue, Process, ProcessDraft, ProcessField, TabSpec},
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    error::{remote_code, ProcessError},
    gateway::ProcessGateway,
    notifications::Notifier,
    pipeline::LoadOutcome,
};

/// Processes attached to clients, and the draft lifecycle of the process
/// form.
pub struct ProcessAssociationManager {
    gateway: Arc<dyn ProcessGateway>,
    notifier: Notifier,
    processes: RwLock<Vec<Process>>,
}

impl ProcessAssociationManager {
    pub fn new(gateway: Arc<dyn ProcessGateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            processes: RwLock::new(Vec::new()),
        }
    }

    pub async fn refresh(&self) -> LoadOutcome {
        match self.gateway.list_processes().await {
            Ok(fetched) => {
                let count = fetched.len();
                *self.processes.write().await = fetched;
                LoadOutcome::Loaded(count)
            }
            Err(error) => {
                warn!(%error, "failed to load processes");
                self.notifier
                    .error("processes could not be loaded", Some(error.to_string()));
                LoadOutcome::Failed
            }
        }
    }

    pub async fn processes_for(&self, client_id: ClientId) -> Vec<Process> {
        self.processes
            .read()
            .await
            .iter()
            .filter(|p| p.client_id == client_id)
            .cloned()
            .collect()
    }

    pub async fn process_count(&self, client_id: ClientId) -> usize {
        self.processes
            .read()
            .await
            .iter()
            .filter(|p| p.client_id == client_id)
            .count()
    }

    /// Draft for the process form: a copy of `existing`, or a blank process
    /// in the client's destination jurisdiction (Brazil when unknown).
    pub fn begin_edit(&self, existing: Option<&Process>, client: &Client) -> ProcessDraft {
        match existing {
            Some(process) => ProcessDraft::from_process(process),
            None => ProcessDraft::new(client.id, client.destination.unwrap_or_default()),
        }
    }

    pub fn set_field(
        &self,
        draft: &mut ProcessDraft,
        field: ProcessField,
        value: impl Into<FieldValue>,
    ) -> Result<(), ProcessError> {
        draft.set_field(field, value)?;
        Ok(())
    }

    /// Same as [`Self::set_field`] for text typed into the form.
    pub fn set_field_raw(
        &self,
        draft: &mut ProcessDraft,
        field: ProcessField,
        raw: &str,
    ) -> Result<(), ProcessError> {
        draft.set_raw(field, raw)?;
        Ok(())
    }

    pub fn switch_jurisdiction(&self, draft: &mut ProcessDraft, jurisdiction: Jurisdiction) {
        draft.switch_jurisdiction(jurisdiction);
    }

    pub async fn save(&self, draft: &ProcessDraft) -> Result<Process, ProcessError> {
        match self.gateway.save_process(draft).await {
            Ok(saved) => {
                let mut processes = self.processes.write().await;
                match processes.iter_mut().find(|p| p.id == saved.id) {
                    Some(existing) => *existing = saved.clone(),
                    None => processes.push(saved.clone()),
                }
                info!(process_id = %saved.id, client_id = %saved.client_id, "process saved");
                self.notifier.success("process saved", None);
                Ok(saved)
            }
            Err(error) => Err(self.write_failed("process could not be saved", error)),
        }
    }

    pub async fn delete(&self, process_id: ProcessId) -> Result<(), ProcessError> {
        match self.gateway.delete_process(process_id).await {
            Ok(()) => {
                self.processes.write().await.retain(|p| p.id != process_id);
                info!(%process_id, "process deleted");
                self.notifier.success("process deleted", None);
                Ok(())
            }
            Err(error) => Err(self.write_failed("process could not be deleted", error)),
        }
    }

    fn write_failed(&self, title: &str, error: anyhow::Error) -> ProcessError {
        if remote_code(&error) == Some(ErrorCode::NotImplemented) {
            self.notifier.error(
                title,
                Some("process persistence is not available yet".to_string()),
            );
            return ProcessError::NotImplemented;
        }
        warn!(%error, "process write failed");
        self.notifier.error(title, Some(error.to_string()));
        ProcessError::Remote(error.to_string())
    }

    pub fn render_schema(&self, jurisdiction: Jurisdiction) -> &'static [TabSpec] {
        form_schema(jurisdiction)
    }
}

#[cfg(test)]
#[path = "tests/processes_tests.rs"]
mod tests;
