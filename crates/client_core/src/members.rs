use std::sync::Arc;

use shared::{
    domain::{Member, UserId},
    error::ErrorCode,
    protocol::{CreateMemberRequest, UpdateMemberRequest},
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    error::{remote_code, MemberError},
    gateway::MemberGateway,
    notifications::Notifier,
    pipeline::LoadOutcome,
};

/// Staff accounts, newest first.
pub struct MemberDirectory {
    gateway: Arc<dyn MemberGateway>,
    notifier: Notifier,
    members: RwLock<Vec<Member>>,
}

impl MemberDirectory {
    pub fn new(gateway: Arc<dyn MemberGateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            members: RwLock::new(Vec::new()),
        }
    }

    pub async fn refresh(&self) -> LoadOutcome {
        match self.gateway.list_members().await {
            Ok(mut fetched) => {
                fetched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let count = fetched.len();
                *self.members.write().await = fetched;
                LoadOutcome::Loaded(count)
            }
            Err(error) => {
                warn!(%error, "failed to load members");
                self.notifier
                    .error("members could not be loaded", Some(error.to_string()));
                LoadOutcome::Failed
            }
        }
    }

    pub async fn members(&self) -> Vec<Member> {
        self.members.read().await.clone()
    }

    pub async fn search(&self, term: &str) -> Vec<Member> {
        let needle = term.trim().to_lowercase();
        self.members
            .read()
            .await
            .iter()
            .filter(|m| {
                needle.is_empty()
                    || m.name.to_lowercase().contains(&needle)
                    || m.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Member, MemberError> {
        validate(name, email)?;
        if password.is_empty() {
            return Err(MemberError::Validation("password is required".to_string()));
        }

        let req = CreateMemberRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.gateway.create_member(&req).await {
            Ok(member) => {
                self.members.write().await.insert(0, member.clone());
                info!(user_id = %member.id, "member created");
                self.notifier.success("member created", None);
                Ok(member)
            }
            Err(error) => Err(self.write_failed("member could not be created", error)),
        }
    }

    pub async fn update(
        &self,
        user_id: UserId,
        name: &str,
        email: &str,
        active: Option<bool>,
    ) -> Result<Member, MemberError> {
        validate(name, email)?;

        let req = UpdateMemberRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            active,
        };
        match self.gateway.update_member(user_id, &req).await {
            Ok(member) => {
                if let Some(existing) = self
                    .members
                    .write()
                    .await
                    .iter_mut()
                    .find(|m| m.id == user_id)
                {
                    *existing = member.clone();
                }
                self.notifier.success("member updated", None);
                Ok(member)
            }
            Err(error) => Err(self.write_failed("member could not be updated", error)),
        }
    }

    /// Deletes only when `confirmation_email` matches the member's e-mail.
    pub async fn delete(&self, user_id: UserId, confirmation_email: &str) -> Result<(), MemberError> {
        let member = self
            .members
            .read()
            .await
            .iter()
            .find(|m| m.id == user_id)
            .cloned()
            .ok_or(MemberError::NotFound)?;
        if !confirmation_email.trim().eq_ignore_ascii_case(&member.email) {
            return Err(MemberError::ConfirmationMismatch);
        }

        match self.gateway.delete_member(user_id).await {
            Ok(()) => {
                self.members.write().await.retain(|m| m.id != user_id);
                info!(%user_id, "member deleted");
                self.notifier.success("member deleted", None);
                Ok(())
            }
            Err(error) => Err(self.write_failed("member could not be deleted", error)),
        }
    }

    fn write_failed(&self, title: &str, error: anyhow::Error) -> MemberError {
        warn!(%error, "member write failed");
        self.notifier.error(title, Some(error.to_string()));
        match remote_code(&error) {
            Some(ErrorCode::Conflict) => MemberError::EmailTaken,
            Some(ErrorCode::NotFound) => MemberError::NotFound,
            _ => MemberError::Remote(error.to_string()),
        }
    }
}

fn validate(name: &str, email: &str) -> Result<(), MemberError> {
    if name.trim().is_empty() {
        return Err(MemberError::Validation("name is required".to_string()));
    }
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(MemberError::Validation("a valid email is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/members_tests.rs"]
mod tests;
