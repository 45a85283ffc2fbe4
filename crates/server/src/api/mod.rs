use shared::{
    domain::{Client, ClientId, ClientUpdate, Member, NewClient, StatusTag, UserId},
    error::{ApiError, ErrorCode},
    process::Process,
    protocol::{
        AuthenticateRequest, AuthenticatedUser, CreateMemberRequest, UpdateMemberRequest,
        UpdatePasswordRequest,
    },
};
use storage::{CreateUserOutcome, Storage};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

/// Zero rows for bad credentials or a deactivated account, one row otherwise.
pub async fn authenticate(
    ctx: &ApiContext,
    req: &AuthenticateRequest,
) -> Result<Vec<AuthenticatedUser>, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Ok(Vec::new());
    }
    let user = ctx
        .storage
        .authenticate_user(&req.email, &req.password)
        .await
        .map_err(internal)?;
    Ok(user.into_iter().collect())
}

pub async fn update_password(
    ctx: &ApiContext,
    req: &UpdatePasswordRequest,
) -> Result<(), ApiError> {
    if req.new_password.is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "new password cannot be empty",
        ));
    }
    let updated = ctx
        .storage
        .update_user_password(req.user_id, &req.new_password)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(ApiError::new(ErrorCode::NotFound, "user not found"));
    }
    Ok(())
}

pub async fn list_clients(ctx: &ApiContext) -> Result<Vec<Client>, ApiError> {
    ctx.storage.list_clients().await.map_err(internal)
}

pub async fn get_client(ctx: &ApiContext, client_id: ClientId) -> Result<Client, ApiError> {
    ctx.storage
        .load_client(client_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| client_not_found(client_id))
}

pub async fn create_client(ctx: &ApiContext, new_client: &NewClient) -> Result<Client, ApiError> {
    if new_client.name.trim().is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "client name cannot be empty",
        ));
    }
    ctx.storage
        .create_client(new_client)
        .await
        .map_err(internal)
}

/// Writes the status column only. Tags outside the stage table are stored
/// as given; clients render them with the fallback entry.
pub async fn update_client_status(
    ctx: &ApiContext,
    client_id: ClientId,
    status: &StatusTag,
) -> Result<Client, ApiError> {
    if status.as_str().trim().is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "status cannot be empty"));
    }
    let updated = ctx
        .storage
        .update_client_status(client_id, status)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(client_not_found(client_id));
    }
    get_client(ctx, client_id).await
}

pub async fn update_client(
    ctx: &ApiContext,
    client_id: ClientId,
    update: &ClientUpdate,
) -> Result<Client, ApiError> {
    if update.name.trim().is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "client name cannot be empty",
        ));
    }
    let updated = ctx
        .storage
        .update_client(client_id, update)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(client_not_found(client_id));
    }
    get_client(ctx, client_id).await
}

pub async fn list_members(ctx: &ApiContext) -> Result<Vec<Member>, ApiError> {
    ctx.storage.list_users().await.map_err(internal)
}

pub async fn create_member(
    ctx: &ApiContext,
    req: &CreateMemberRequest,
) -> Result<Member, ApiError> {
    validate_member_fields(&req.name, &req.email)?;
    if req.password.is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "password cannot be empty"));
    }
    match ctx
        .storage
        .create_user(&req.name, &req.email, &req.password)
        .await
        .map_err(internal)?
    {
        CreateUserOutcome::Created(member) => Ok(member),
        CreateUserOutcome::EmailTaken => Err(ApiError::new(
            ErrorCode::Conflict,
            "email is already registered",
        )),
    }
}

pub async fn update_member(
    ctx: &ApiContext,
    user_id: UserId,
    req: &UpdateMemberRequest,
) -> Result<Member, ApiError> {
    validate_member_fields(&req.name, &req.email)?;
    let owner = ctx
        .storage
        .user_id_for_email(&req.email)
        .await
        .map_err(internal)?;
    if owner.is_some_and(|owner| owner != user_id) {
        return Err(ApiError::new(
            ErrorCode::Conflict,
            "email is already registered",
        ));
    }
    let updated = ctx
        .storage
        .update_user(user_id, &req.name, &req.email, req.active)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(user_not_found());
    }
    ctx.storage
        .load_user(user_id)
        .await
        .map_err(internal)?
        .ok_or_else(user_not_found)
}

pub async fn delete_member(ctx: &ApiContext, user_id: UserId) -> Result<(), ApiError> {
    let deleted = ctx.storage.delete_user(user_id).await.map_err(internal)?;
    if !deleted {
        return Err(user_not_found());
    }
    Ok(())
}

/// There is no processes table yet, so the listing is always empty.
pub async fn list_processes(_ctx: &ApiContext) -> Result<Vec<Process>, ApiError> {
    Ok(Vec::new())
}

pub fn process_writes_unavailable() -> ApiError {
    ApiError::new(
        ErrorCode::NotImplemented,
        "process persistence is not implemented",
    )
}

fn validate_member_fields(name: &str, email: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "name cannot be empty"));
    }
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::new(ErrorCode::Validation, "email is invalid"));
    }
    Ok(())
}

fn client_not_found(client_id: ClientId) -> ApiError {
    ApiError::new(ErrorCode::NotFound, format!("client {client_id} not found"))
}

fn user_not_found() -> ApiError {
    ApiError::new(ErrorCode::NotFound, "user not found")
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
