use super::*;
use crate::{
    gateway::UnimplementedProcessGateway,
    notifications::{Notification, NotificationLevel},
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::StatusTag,
    process::{DraftError, FormTab, JurisdictionFields},
};
use tokio::sync::{broadcast, Mutex};

/// Backend that does keep processes, for the paths real persistence takes.
#[derive(Default)]
struct InMemoryProcessGateway {
    stored: Mutex<Vec<Process>>,
    next_id: Mutex<i64>,
}

#[async_trait]
impl ProcessGateway for InMemoryProcessGateway {
    async fn list_processes(&self) -> Result<Vec<Process>> {
        Ok(self.stored.lock().await.clone())
    }

    async fn save_process(&self, draft: &ProcessDraft) -> Result<Process> {
        let id = match draft.id {
            Some(id) => id,
            None => {
                let mut next = self.next_id.lock().await;
                *next += 1;
                ProcessId(*next)
            }
        };
        let process = Process {
            id,
            client_id: draft.client_id,
            common: draft.common.clone(),
            specific: draft.specific.clone(),
            created_at: Utc::now(),
        };
        let mut stored = self.stored.lock().await;
        stored.retain(|p| p.id != id);
        stored.push(process.clone());
        Ok(process)
    }

    async fn delete_process(&self, process_id: ProcessId) -> Result<()> {
        self.stored.lock().await.retain(|p| p.id != process_id);
        Ok(())
    }
}

fn client(id: i64, destination: Option<Jurisdiction>) -> Client {
    Client {
        id: ClientId(id),
        name: format!("cliente {id}"),
        interest: String::new(),
        notes: String::new(),
        scheduling_done: false,
        follow_up_done: false,
        status: StatusTag::new("CONSULTORIA_AGENDADA"),
        destination,
        created_at: Utc::now(),
    }
}

fn unimplemented_manager() -> (ProcessAssociationManager, broadcast::Receiver<Notification>) {
    let notifier = Notifier::new();
    let events = notifier.subscribe();
    (
        ProcessAssociationManager::new(Arc::new(UnimplementedProcessGateway), notifier),
        events,
    )
}

#[tokio::test]
async fn save_and_delete_report_not_implemented() {
    let (manager, mut events) = unimplemented_manager();
    let draft = manager.begin_edit(None, &client(1, None));

    let err = manager.save(&draft).await.expect_err("save must not succeed");
    assert!(matches!(err, ProcessError::NotImplemented));
    let err = manager
        .delete(ProcessId(3))
        .await
        .expect_err("delete must not succeed");
    assert!(matches!(err, ProcessError::NotImplemented));

    let first = events.try_recv().expect("save notification");
    assert_eq!(first.level, NotificationLevel::Error);
    assert_eq!(first.title, "process could not be saved");
    let second = events.try_recv().expect("delete notification");
    assert_eq!(second.title, "process could not be deleted");
    assert!(manager.processes_for(ClientId(1)).await.is_empty());
}

#[tokio::test]
async fn refresh_with_no_backend_table_is_empty() {
    let (manager, _events) = unimplemented_manager();
    assert_eq!(manager.refresh().await, LoadOutcome::Loaded(0));
    assert_eq!(manager.process_count(ClientId(1)).await, 0);
}

#[tokio::test]
async fn new_draft_uses_client_destination() {
    let (manager, _events) = unimplemented_manager();

    let brazil = manager.begin_edit(None, &client(1, None));
    assert_eq!(brazil.jurisdiction(), Jurisdiction::Brazil);
    assert!(brazil.is_new());

    let portugal = manager.begin_edit(None, &client(2, Some(Jurisdiction::Portugal)));
    assert_eq!(portugal.jurisdiction(), Jurisdiction::Portugal);
    assert_eq!(portugal.client_id, ClientId(2));
}

#[tokio::test]
async fn switching_jurisdiction_keeps_common_fields_only() {
    let (manager, _events) = unimplemented_manager();
    let mut draft = manager.begin_edit(None, &client(1, None));

    manager
        .set_field(&mut draft, ProcessField::Summary, "ação de cobrança")
        .expect("common field");
    manager
        .set_field_raw(&mut draft, ProcessField::ClaimValue, "1.500,50")
        .expect("number field");
    manager
        .set_field(&mut draft, ProcessField::CnjNumber, "0001234-55.2024.8.26.0100")
        .expect("brazil field");

    manager.switch_jurisdiction(&mut draft, Jurisdiction::Portugal);

    assert_eq!(draft.common.summary, "ação de cobrança");
    assert_eq!(draft.common.claim_value, 1500.5);
    let JurisdictionFields::Portugal(fields) = &draft.specific else {
        panic!("draft should be a Portugal draft");
    };
    assert!(fields.court_case_number.is_empty());

    manager.switch_jurisdiction(&mut draft, Jurisdiction::Brazil);
    let JurisdictionFields::Brazil(fields) = &draft.specific else {
        panic!("draft should be a Brazil draft");
    };
    assert!(fields.cnj_number.is_empty());
}

#[tokio::test]
async fn other_jurisdiction_fields_are_rejected() {
    let (manager, _events) = unimplemented_manager();
    let mut draft = manager.begin_edit(None, &client(1, Some(Jurisdiction::Portugal)));

    let err = manager
        .set_field(&mut draft, ProcessField::FreeJustice, true)
        .expect_err("brazil-only field");
    assert!(matches!(
        err,
        ProcessError::Draft(DraftError::WrongJurisdiction {
            field: ProcessField::FreeJustice,
            jurisdiction: Jurisdiction::Portugal,
        })
    ));
}

#[tokio::test]
async fn schema_differs_by_jurisdiction() {
    let (manager, _events) = unimplemented_manager();
    let brazil = manager.render_schema(Jurisdiction::Brazil);
    let portugal = manager.render_schema(Jurisdiction::Portugal);

    let tabs: Vec<_> = brazil.iter().map(|t| t.tab).collect();
    assert_eq!(
        tabs,
        vec![
            FormTab::Identification,
            FormTab::Court,
            FormTab::Parties,
            FormTab::Financial,
            FormTab::Deadlines,
            FormTab::Other,
        ]
    );
    let has = |schema: &[TabSpec], field: ProcessField| {
        schema
            .iter()
            .any(|tab| tab.fields.iter().any(|spec| spec.field == field))
    };
    assert!(has(brazil, ProcessField::CnjNumber));
    assert!(!has(portugal, ProcessField::CnjNumber));
    assert!(has(portugal, ProcessField::CourtCaseNumber));
    assert!(!has(brazil, ProcessField::CourtCaseNumber));
}

#[tokio::test]
async fn working_backend_persists_and_counts_per_client() {
    let notifier = Notifier::new();
    let mut events = notifier.subscribe();
    let manager =
        ProcessAssociationManager::new(Arc::new(InMemoryProcessGateway::default()), notifier);

    let owner = client(7, None);
    let mut draft = manager.begin_edit(None, &owner);
    manager
        .set_field(&mut draft, ProcessField::CaseType, "cível")
        .expect("field");
    let saved = manager.save(&draft).await.expect("save");
    manager
        .save(&manager.begin_edit(None, &client(8, None)))
        .await
        .expect("save other client");

    assert_eq!(manager.process_count(ClientId(7)).await, 1);
    assert_eq!(manager.processes_for(ClientId(8)).await.len(), 1);

    let mut edit = manager.begin_edit(Some(&saved), &owner);
    assert!(!edit.is_new());
    manager
        .set_field(&mut edit, ProcessField::Urgency, "alta")
        .expect("field");
    manager.save(&edit).await.expect("update");
    let for_owner = manager.processes_for(ClientId(7)).await;
    assert_eq!(for_owner.len(), 1);
    assert_eq!(for_owner[0].common.urgency, "alta");

    manager.delete(saved.id).await.expect("delete");
    assert_eq!(manager.process_count(ClientId(7)).await, 0);
    assert_eq!(manager.refresh().await, LoadOutcome::Loaded(1));

    let first = events.try_recv().expect("notification");
    assert_eq!(first.level, NotificationLevel::Success);
    assert_eq!(first.title, "process saved");
}
