use super::*;

fn intake(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        interest: "trabalhista".to_string(),
        notes: String::new(),
        status: None,
        destination: None,
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn new_client_starts_in_intake_stage() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let client = storage.create_client(&intake("Ana")).await.expect("client");
    assert_eq!(client.status.as_str(), "EM_ATENDIMENTO");
    assert!(!client.scheduling_done);
    assert!(!client.follow_up_done);
    assert_eq!(client.destination, None);
}

#[tokio::test]
async fn lists_clients_newest_first() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let first = storage.create_client(&intake("first")).await.expect("first");
    let second = storage.create_client(&intake("second")).await.expect("second");
    let third = storage.create_client(&intake("third")).await.expect("third");

    let listed = storage.list_clients().await.expect("list");
    let ids: Vec<_> = listed.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn status_update_touches_only_status() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let client = storage.create_client(&intake("Bruno")).await.expect("client");

    let updated = storage
        .update_client_status(client.id, &StatusTag::new("FINALIZADO"))
        .await
        .expect("update");
    assert!(updated);

    let reloaded = storage
        .load_client(client.id)
        .await
        .expect("load")
        .expect("exists");
    assert_eq!(reloaded.status.as_str(), "FINALIZADO");
    assert_eq!(reloaded.name, client.name);
    assert_eq!(reloaded.interest, client.interest);
}

#[tokio::test]
async fn status_update_for_missing_client_reports_false() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let updated = storage
        .update_client_status(ClientId(404), &StatusTag::new("FINALIZADO"))
        .await
        .expect("update");
    assert!(!updated);
}

#[tokio::test]
async fn unknown_status_tags_are_stored_verbatim() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let mut new_client = intake("Carla");
    new_client.status = Some(StatusTag::new("LEGADO"));
    new_client.destination = Some(Jurisdiction::Portugal);
    let client = storage.create_client(&new_client).await.expect("client");
    assert_eq!(client.status.as_str(), "LEGADO");
    assert_eq!(client.destination, Some(Jurisdiction::Portugal));
}

#[tokio::test]
async fn field_update_writes_flags_and_text() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let client = storage.create_client(&intake("Davi")).await.expect("client");

    let mut update = ClientUpdate::from(&client);
    update.notes = "ligar segunda".to_string();
    update.scheduling_done = true;
    update.follow_up_done = true;
    assert!(storage.update_client(client.id, &update).await.expect("update"));

    let reloaded = storage
        .load_client(client.id)
        .await
        .expect("load")
        .expect("exists");
    assert_eq!(reloaded.notes, "ligar segunda");
    assert!(reloaded.scheduling_done);
    assert!(reloaded.follow_up_done);
}

#[tokio::test]
async fn authenticates_with_correct_password_only() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let CreateUserOutcome::Created(member) = storage
        .create_user("Luiza", "Luiza@Example.com", "s3nha")
        .await
        .expect("user")
    else {
        panic!("expected user to be created");
    };
    assert_eq!(member.email, "luiza@example.com");

    let user = storage
        .authenticate_user("luiza@example.com", "s3nha")
        .await
        .expect("auth")
        .expect("valid credentials");
    assert_eq!(user.id, member.id);
    assert!(user.active);

    let wrong = storage
        .authenticate_user("luiza@example.com", "nope")
        .await
        .expect("auth");
    assert!(wrong.is_none());

    let unknown = storage
        .authenticate_user("ghost@example.com", "s3nha")
        .await
        .expect("auth");
    assert!(unknown.is_none());
}

#[tokio::test]
async fn duplicate_email_is_reported() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .create_user("A", "a@example.com", "x")
        .await
        .expect("first");
    let outcome = storage
        .create_user("B", "A@example.com", "y")
        .await
        .expect("second");
    assert_eq!(outcome, CreateUserOutcome::EmailTaken);

    assert!(storage
        .user_id_for_email(" A@EXAMPLE.com ")
        .await
        .expect("lookup")
        .is_some());
    assert!(storage
        .user_id_for_email("nobody@example.com")
        .await
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn password_change_invalidates_old_password() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let CreateUserOutcome::Created(member) = storage
        .create_user("Marta", "marta@example.com", "old")
        .await
        .expect("user")
    else {
        panic!("expected user to be created");
    };

    assert!(storage
        .update_user_password(member.id, "new")
        .await
        .expect("update"));
    assert!(storage
        .authenticate_user("marta@example.com", "old")
        .await
        .expect("auth")
        .is_none());
    assert!(storage
        .authenticate_user("marta@example.com", "new")
        .await
        .expect("auth")
        .is_some());
}

#[tokio::test]
async fn member_edit_and_delete() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let CreateUserOutcome::Created(member) = storage
        .create_user("Rui", "rui@example.com", "pw")
        .await
        .expect("user")
    else {
        panic!("expected user to be created");
    };

    assert!(storage
        .update_user(member.id, "Rui Costa", "rui@example.com", Some(false))
        .await
        .expect("update"));
    let reloaded = storage
        .load_user(member.id)
        .await
        .expect("load")
        .expect("exists");
    assert_eq!(reloaded.name, "Rui Costa");
    assert!(!reloaded.active);

    assert!(storage
        .update_user(member.id, "Rui Costa", "rui@example.com", None)
        .await
        .expect("update"));
    let still_inactive = storage
        .load_user(member.id)
        .await
        .expect("load")
        .expect("exists");
    assert!(!still_inactive.active);

    assert!(storage.delete_user(member.id).await.expect("delete"));
    assert!(storage.list_users().await.expect("list").is_empty());
    assert!(!storage.delete_user(member.id).await.expect("delete again"));
}

#[tokio::test]
async fn stores_argon2_phc_hash() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let CreateUserOutcome::Created(member) = storage
        .create_user("Iris", "iris@example.com", "s3nha")
        .await
        .expect("user")
    else {
        panic!("expected user to be created");
    };

    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = ?")
        .bind(member.id.0.to_string())
        .fetch_one(storage.pool())
        .await
        .expect("hash");
    assert!(stored.starts_with("$argon2id$"), "unexpected hash: {stored}");
    assert!(!stored.contains("s3nha"));
    assert!(verify_password("s3nha", &stored).expect("verify"));
}

#[tokio::test]
async fn deactivated_member_cannot_authenticate() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let CreateUserOutcome::Created(member) = storage
        .create_user("Davi", "davi@example.com", "pw")
        .await
        .expect("user")
    else {
        panic!("expected user to be created");
    };

    assert!(storage
        .update_user(member.id, "Davi", "davi@example.com", Some(false))
        .await
        .expect("deactivate"));
    assert!(storage
        .authenticate_user("davi@example.com", "pw")
        .await
        .expect("auth")
        .is_none());

    assert!(storage
        .update_user(member.id, "Davi", "davi@example.com", Some(true))
        .await
        .expect("reactivate"));
    assert!(storage
        .authenticate_user("davi@example.com", "pw")
        .await
        .expect("auth")
        .is_some());
}
