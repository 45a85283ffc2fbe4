use super::*;
use axum::{
    body::{self, Body},
    http::Request,
    response::Response,
};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

async fn test_app() -> (Router, Storage) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let api = ApiContext {
        storage: storage.clone(),
    };
    let app = build_router(Arc::new(AppState { api }));
    (app, storage)
}

fn json_request(method: &str, uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let (app, _storage) = test_app().await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn clients_are_listed_newest_first() {
    let (app, _storage) = test_app().await;
    for name in ["Ana", "Bia", "Caio"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/clients",
                serde_json::json!({ "name": name, "interest": "vistos" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(Request::get("/clients").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let clients: Vec<Client> = read_json(response).await;
    let names: Vec<_> = clients.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Caio", "Bia", "Ana"]);
    assert!(clients.iter().all(|c| c.status.as_str() == "EM_ATENDIMENTO"));
}

#[tokio::test]
async fn status_write_persists() {
    let (app, storage) = test_app().await;
    let client = storage
        .create_client(&NewClient {
            name: "Duda".to_string(),
            interest: String::new(),
            notes: String::new(),
            status: None,
            destination: None,
        })
        .await
        .expect("client");

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/clients/{}/status", client.id),
            serde_json::json!({ "status": "CONSULTORIA_AGENDADA" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::get(format!("/clients/{}", client.id))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let reloaded: Client = read_json(response).await;
    assert_eq!(reloaded.status.as_str(), "CONSULTORIA_AGENDADA");
}

#[tokio::test]
async fn missing_client_maps_to_not_found() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(json_request(
            "PATCH",
            "/clients/999/status",
            serde_json::json!({ "status": "FINALIZADO" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let err: ApiError = read_json(response).await;
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn authenticate_rpc_answers_with_rows() {
    let (app, storage) = test_app().await;
    storage
        .create_user("Lia", "lia@example.com", "segredo")
        .await
        .expect("user");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/rpc/authenticate_user",
            serde_json::json!({ "email": "lia@example.com", "password": "segredo" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let rows: Vec<AuthenticatedUser> = read_json(response).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Lia");

    let response = app
        .oneshot(json_request(
            "POST",
            "/rpc/authenticate_user",
            serde_json::json!({ "email": "lia@example.com", "password": "errada" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let rows: Vec<AuthenticatedUser> = read_json(response).await;
    assert!(rows.is_empty());
}

#[tokio::test]
async fn member_routes_create_edit_and_delete() {
    let (app, _storage) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users",
            serde_json::json!({ "name": "Nina", "email": "nina@example.com", "password": "pw" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let member: Member = read_json(response).await;

    let conflict = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users",
            serde_json::json!({ "name": "Nina 2", "email": "nina@example.com", "password": "pw" }),
        ))
        .await
        .expect("response");
    assert_eq!(conflict.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/users/{}", member.id),
            serde_json::json!({ "name": "Nina Souza", "email": "nina@example.com", "active": false }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let edited: Member = read_json(response).await;
    assert_eq!(edited.name, "Nina Souza");
    assert!(!edited.active);

    let response = app
        .clone()
        .oneshot(
            Request::delete(format!("/users/{}", member.id))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(Request::get("/users").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let members: Vec<Member> = read_json(response).await;
    assert!(members.is_empty());
}

#[tokio::test]
async fn process_routes_list_empty_and_refuse_writes() {
    let (app, _storage) = test_app().await;

    let response = app
        .clone()
        .oneshot(Request::get("/processes").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let processes: Vec<Process> = read_json(response).await;
    assert!(processes.is_empty());

    for method in ["POST", "PUT", "DELETE"] {
        let response = app
            .clone()
            .oneshot(json_request(method, "/processes", serde_json::json!({})))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        let err: ApiError = read_json(response).await;
        assert_eq!(err.code, ErrorCode::NotImplemented);
    }
}
