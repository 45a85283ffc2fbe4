use shared::{
    domain::{NewClient, StatusTag},
    status,
};
use storage::Storage;

#[tokio::test]
async fn intake_to_resolution_walks_every_stage() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    let client = storage
        .create_client(&NewClient {
            name: "Helena".to_string(),
            interest: "divórcio".to_string(),
            notes: String::new(),
            status: None,
            destination: None,
        })
        .await
        .expect("client");
    assert_eq!(client.status.as_str(), status::locked_tag());

    for stage in status::STAGES.iter().skip(1) {
        assert!(storage
            .update_client_status(client.id, &StatusTag::new(stage.tag))
            .await
            .expect("move"));
        let reloaded = storage
            .load_client(client.id)
            .await
            .expect("load")
            .expect("exists");
        assert_eq!(reloaded.status.as_str(), stage.tag);
        assert_eq!(reloaded.created_at, client.created_at);
    }
}
