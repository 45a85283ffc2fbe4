//! Remote seams. Managers only see these traits; [`HttpGateway`] talks to the
//! backend service over HTTP/JSON.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};
use shared::{
    domain::{Client, ClientId, ClientUpdate, Member, ProcessId, StatusTag, UserId},
    error::{ApiError, ApiException, ErrorCode},
    process::{Process, ProcessDraft},
    protocol::{
        authenticate_route, client_route, client_status_route, clients_route, processes_route,
        update_password_route, user_route, users_route, AuthenticateRequest, AuthenticatedUser,
        CreateMemberRequest, UpdateMemberRequest, UpdatePasswordRequest, UpdateStatusRequest,
    },
};

#[async_trait]
pub trait ClientGateway: Send + Sync {
    /// All clients, newest first.
    async fn list_clients(&self) -> Result<Vec<Client>>;
    async fn update_status(&self, client_id: ClientId, status: &StatusTag) -> Result<()>;
    async fn update_client(&self, client_id: ClientId, update: &ClientUpdate) -> Result<()>;
}

#[async_trait]
pub trait ProcessGateway: Send + Sync {
    async fn list_processes(&self) -> Result<Vec<Process>>;
    async fn save_process(&self, draft: &ProcessDraft) -> Result<Process>;
    async fn delete_process(&self, process_id: ProcessId) -> Result<()>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Zero rows means the credentials were rejected.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Vec<AuthenticatedUser>>;
    async fn update_password(&self, user_id: UserId, new_password: &str) -> Result<()>;
    async fn update_profile(&self, user_id: UserId, name: &str, email: &str) -> Result<Member>;
}

#[async_trait]
pub trait MemberGateway: Send + Sync {
    async fn list_members(&self) -> Result<Vec<Member>>;
    async fn create_member(&self, req: &CreateMemberRequest) -> Result<Member>;
    async fn update_member(&self, user_id: UserId, req: &UpdateMemberRequest) -> Result<Member>;
    async fn delete_member(&self, user_id: UserId) -> Result<()>;
}

/// Process backend for deployments without a processes table: listing is
/// empty and every write is refused.
pub struct UnimplementedProcessGateway;

#[async_trait]
impl ProcessGateway for UnimplementedProcessGateway {
    async fn list_processes(&self) -> Result<Vec<Process>> {
        Ok(Vec::new())
    }

    async fn save_process(&self, _draft: &ProcessDraft) -> Result<Process> {
        Err(not_implemented())
    }

    async fn delete_process(&self, _process_id: ProcessId) -> Result<()> {
        Err(not_implemented())
    }
}

fn not_implemented() -> anyhow::Error {
    ApiException::new(
        ErrorCode::NotImplemented,
        "process persistence is not implemented",
    )
    .into()
}

#[derive(Clone)]
pub struct HttpGateway {
    http: HttpClient,
    server_url: String,
}

impl HttpGateway {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self {
            http: HttpClient::new(),
            server_url,
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.server_url)
    }
}

/// Turns a non-success response into an error, keeping the server's
/// [`ApiError`] code when the body carries one.
async fn expect_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => Err(ApiException::from(api_error).into()),
        Err(_) => Err(anyhow!("server responded with {status}: {body}")),
    }
}

#[async_trait]
impl ClientGateway for HttpGateway {
    async fn list_clients(&self) -> Result<Vec<Client>> {
        let response = self.http.get(self.url(clients_route())).send().await?;
        Ok(expect_success(response).await?.json().await?)
    }

    async fn update_status(&self, client_id: ClientId, status: &StatusTag) -> Result<()> {
        let response = self
            .http
            .patch(self.url(&client_status_route(client_id)))
            .json(&UpdateStatusRequest {
                status: status.clone(),
            })
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn update_client(&self, client_id: ClientId, update: &ClientUpdate) -> Result<()> {
        let response = self
            .http
            .patch(self.url(&client_route(client_id)))
            .json(update)
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ProcessGateway for HttpGateway {
    async fn list_processes(&self) -> Result<Vec<Process>> {
        let response = self.http.get(self.url(processes_route())).send().await?;
        Ok(expect_success(response).await?.json().await?)
    }

    async fn save_process(&self, draft: &ProcessDraft) -> Result<Process> {
        let request = if draft.is_new() {
            self.http.post(self.url(processes_route()))
        } else {
            self.http.put(self.url(processes_route()))
        };
        let response = request.json(draft).send().await?;
        Ok(expect_success(response).await?.json().await?)
    }

    async fn delete_process(&self, process_id: ProcessId) -> Result<()> {
        let response = self
            .http
            .delete(self.url(processes_route()))
            .query(&[("id", process_id.0)])
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Vec<AuthenticatedUser>> {
        let response = self
            .http
            .post(self.url(authenticate_route()))
            .json(&AuthenticateRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        Ok(expect_success(response).await?.json().await?)
    }

    async fn update_password(&self, user_id: UserId, new_password: &str) -> Result<()> {
        let response = self
            .http
            .post(self.url(update_password_route()))
            .json(&UpdatePasswordRequest {
                user_id,
                new_password: new_password.to_string(),
            })
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn update_profile(&self, user_id: UserId, name: &str, email: &str) -> Result<Member> {
        self.update_member(
            user_id,
            &UpdateMemberRequest {
                name: name.to_string(),
                email: email.to_string(),
                active: None,
            },
        )
        .await
    }
}

#[async_trait]
impl MemberGateway for HttpGateway {
    async fn list_members(&self) -> Result<Vec<Member>> {
        let response = self.http.get(self.url(users_route())).send().await?;
        Ok(expect_success(response).await?.json().await?)
    }

    async fn create_member(&self, req: &CreateMemberRequest) -> Result<Member> {
        let response = self
            .http
            .post(self.url(users_route()))
            .json(req)
            .send()
            .await?;
        Ok(expect_success(response).await?.json().await?)
    }

    async fn update_member(&self, user_id: UserId, req: &UpdateMemberRequest) -> Result<Member> {
        let response = self
            .http
            .patch(self.url(&user_route(user_id)))
            .json(req)
            .send()
            .await?;
        Ok(expect_success(response).await?.json().await?)
    }

    async fn delete_member(&self, user_id: UserId) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&user_route(user_id)))
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
