use serde::{Deserialize, Serialize};

use crate::domain::{ClientId, StatusTag, UserId};

pub fn authenticate_route() -> &'static str {
    "/rpc/authenticate_user"
}

pub fn update_password_route() -> &'static str {
    "/rpc/update_user_password"
}

pub fn clients_route() -> &'static str {
    "/clients"
}

pub fn client_route(client_id: ClientId) -> String {
    format!("/clients/{}", client_id.0)
}

pub fn client_status_route(client_id: ClientId) -> String {
    format!("/clients/{}/status", client_id.0)
}

pub fn users_route() -> &'static str {
    "/users"
}

pub fn user_route(user_id: UserId) -> String {
    format!("/users/{}", user_id.0)
}

pub fn processes_route() -> &'static str {
    "/processes"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

/// Row returned by the authentication RPC. The RPC answers with zero rows for
/// bad credentials and one row otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    pub user_id: UserId,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: StatusTag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
