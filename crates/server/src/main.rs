use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use shared::{
    domain::{Client, ClientId, ClientUpdate, Member, NewClient, UserId},
    error::{ApiError, ErrorCode},
    process::Process,
    protocol::{
        AuthenticateRequest, AuthenticatedUser, CreateMemberRequest, UpdateMemberRequest,
        UpdatePasswordRequest, UpdateStatusRequest,
    },
};
use storage::Storage;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::ApiContext;
use app_state::AppState;
use config::{load_settings, prepare_database_url};

type HttpResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/rpc/authenticate_user", post(http_authenticate))
        .route("/rpc/update_user_password", post(http_update_password))
        .route("/clients", get(http_list_clients).post(http_create_client))
        .route(
            "/clients/:client_id",
            get(http_get_client).patch(http_update_client),
        )
        .route("/clients/:client_id/status", patch(http_update_status))
        .route("/users", get(http_list_members).post(http_create_member))
        .route(
            "/users/:user_id",
            patch(http_update_member).delete(http_delete_member),
        )
        .route(
            "/processes",
            get(http_list_processes)
                .post(http_process_write)
                .put(http_process_write)
                .delete(http_process_write),
        )
        .with_state(state)
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    if err.code == ErrorCode::Internal {
        error!(message = %err.message, "request failed");
    }
    (status_for(err.code), Json(err))
}

async fn healthz(State(state): State<Arc<AppState>>) -> HttpResult<&'static str> {
    state.api.storage.health_check().await.map_err(|e| {
        error!(error = %e, "health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new(ErrorCode::Internal, e.to_string())),
        )
    })?;
    Ok("ok")
}

async fn http_authenticate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AuthenticateRequest>,
) -> HttpResult<Json<Vec<AuthenticatedUser>>> {
    let rows = api::authenticate(&state.api, &req).await.map_err(reject)?;
    if rows.is_empty() {
        warn!("rejected sign-in attempt");
    }
    Ok(Json(rows))
}

async fn http_update_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdatePasswordRequest>,
) -> HttpResult<StatusCode> {
    api::update_password(&state.api, &req)
        .await
        .map_err(reject)?;
    info!(user_id = %req.user_id, "password updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn http_list_clients(State(state): State<Arc<AppState>>) -> HttpResult<Json<Vec<Client>>> {
    api::list_clients(&state.api).await.map(Json).map_err(reject)
}

async fn http_get_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<i64>,
) -> HttpResult<Json<Client>> {
    api::get_client(&state.api, ClientId(client_id))
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_create_client(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewClient>,
) -> HttpResult<(StatusCode, Json<Client>)> {
    let client = api::create_client(&state.api, &req)
        .await
        .map_err(reject)?;
    info!(client_id = %client.id, status = %client.status, "client created");
    Ok((StatusCode::CREATED, Json(client)))
}

async fn http_update_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<i64>,
    Json(req): Json<ClientUpdate>,
) -> HttpResult<Json<Client>> {
    api::update_client(&state.api, ClientId(client_id), &req)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_update_status(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> HttpResult<Json<Client>> {
    let client = api::update_client_status(&state.api, ClientId(client_id), &req.status)
        .await
        .map_err(reject)?;
    info!(client_id, status = %client.status, "client status written");
    Ok(Json(client))
}

async fn http_list_members(State(state): State<Arc<AppState>>) -> HttpResult<Json<Vec<Member>>> {
    api::list_members(&state.api).await.map(Json).map_err(reject)
}

async fn http_create_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMemberRequest>,
) -> HttpResult<(StatusCode, Json<Member>)> {
    let member = api::create_member(&state.api, &req)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(member)))
}

async fn http_update_member(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
    Json(req): Json<UpdateMemberRequest>,
) -> HttpResult<Json<Member>> {
    api::update_member(&state.api, user_id, &req)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_delete_member(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> HttpResult<StatusCode> {
    api::delete_member(&state.api, user_id)
        .await
        .map_err(reject)?;
    info!(%user_id, "member deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn http_list_processes(
    State(state): State<Arc<AppState>>,
) -> HttpResult<Json<Vec<Process>>> {
    api::list_processes(&state.api)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_process_write() -> (StatusCode, Json<ApiError>) {
    reject(api::process_writes_unavailable())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
