use std::sync::Arc;

pub mod error;
pub mod gateway;
pub mod kv;
pub mod members;
pub mod notifications;
pub mod pipeline;
pub mod processes;
pub mod session;
pub mod view_preference;

pub use error::{AuthError, MemberError, ProcessError};
pub use gateway::{
    AuthGateway, ClientGateway, HttpGateway, MemberGateway, ProcessGateway,
    UnimplementedProcessGateway,
};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use members::MemberDirectory;
pub use notifications::{Notification, NotificationLevel, Notifier};
pub use pipeline::{BoardColumn, EditOutcome, LoadOutcome, PipelineStateManager, TransitionOutcome};
pub use processes::ProcessAssociationManager;
pub use session::Session;
pub use view_preference::{ViewMode, ViewPreferenceStore};

/// Every manager of one client session, sharing a notifier.
pub struct CrmClient {
    pub notifier: Notifier,
    pub session: Session,
    pub pipeline: PipelineStateManager,
    pub views: ViewPreferenceStore,
    pub processes: ProcessAssociationManager,
    pub members: MemberDirectory,
}

impl CrmClient {
    /// Wires all managers to one HTTP backend. Process persistence goes
    /// through the same backend, which refuses writes until it has a
    /// processes table.
    pub async fn connect(server_url: &str, store: Arc<dyn KeyValueStore>) -> Self {
        let http = Arc::new(HttpGateway::new(server_url));
        Self::with_gateways(
            http.clone(),
            http.clone(),
            http.clone(),
            http,
            store,
        )
        .await
    }

    pub async fn with_gateways(
        clients: Arc<dyn ClientGateway>,
        processes: Arc<dyn ProcessGateway>,
        auth: Arc<dyn AuthGateway>,
        members: Arc<dyn MemberGateway>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let notifier = Notifier::new();
        let session = Session::new(auth, store.clone());
        session.init().await;
        Self {
            pipeline: PipelineStateManager::new(clients, notifier.clone()),
            views: ViewPreferenceStore::load(store).await,
            processes: ProcessAssociationManager::new(processes, notifier.clone()),
            members: MemberDirectory::new(members, notifier.clone()),
            session,
            notifier,
        }
    }
}
