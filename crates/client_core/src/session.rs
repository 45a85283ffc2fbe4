//! The signed-in staff user. Consumers get the session passed in explicitly;
//! the snapshot is mirrored to the key/value store so a restart stays signed
//! in.

use std::sync::Arc;

use shared::protocol::AuthenticatedUser;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{error::AuthError, gateway::AuthGateway, kv::KeyValueStore};

pub const SESSION_USER_KEY: &str = "crm-session-user";

pub struct Session {
    auth: Arc<dyn AuthGateway>,
    store: Arc<dyn KeyValueStore>,
    user: RwLock<Option<AuthenticatedUser>>,
}

impl Session {
    pub fn new(auth: Arc<dyn AuthGateway>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            auth,
            store,
            user: RwLock::new(None),
        }
    }

    /// Restores the stored snapshot, if any. A snapshot that no longer parses
    /// is dropped from the store.
    pub async fn init(&self) -> Option<AuthenticatedUser> {
        let raw = match self.store.get(SESSION_USER_KEY).await {
            Ok(raw) => raw?,
            Err(error) => {
                warn!(%error, "could not read stored session");
                return None;
            }
        };
        match serde_json::from_str::<AuthenticatedUser>(&raw) {
            Ok(user) => {
                *self.user.write().await = Some(user.clone());
                Some(user)
            }
            Err(error) => {
                warn!(%error, "discarding unreadable stored session");
                if let Err(error) = self.store.remove(SESSION_USER_KEY).await {
                    warn!(%error, "could not clear stored session");
                }
                None
            }
        }
    }

    pub async fn current_user(&self) -> Option<AuthenticatedUser> {
        self.user.read().await.clone()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let user = self.verify(email, password).await?;
        self.remember(user.clone()).await;
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    pub async fn logout(&self) {
        *self.user.write().await = None;
        if let Err(error) = self.store.remove(SESSION_USER_KEY).await {
            warn!(%error, "could not clear stored session");
        }
    }

    pub async fn update_profile(
        &self,
        name: &str,
        email: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let current = self.current_user().await.ok_or(AuthError::NotSignedIn)?;
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() {
            return Err(AuthError::Validation(
                "name and email are required".to_string(),
            ));
        }

        let member = self
            .auth
            .update_profile(current.id, name, email)
            .await
            .map_err(|error| {
                warn!(%error, "profile update failed");
                AuthError::Remote
            })?;

        let updated = AuthenticatedUser {
            id: member.id,
            email: member.email,
            name: member.name,
            active: member.active,
        };
        self.remember(updated.clone()).await;
        Ok(updated)
    }

    /// Re-checks `current` against the backend before writing `new`.
    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), AuthError> {
        let user = self.current_user().await.ok_or(AuthError::NotSignedIn)?;
        if current.is_empty() || new.is_empty() || confirm.is_empty() {
            return Err(AuthError::Validation("all fields are required".to_string()));
        }
        if new != confirm {
            return Err(AuthError::Validation("passwords do not match".to_string()));
        }

        self.verify(&user.email, current).await?;
        self.auth
            .update_password(user.id, new)
            .await
            .map_err(|error| {
                warn!(%error, "password update failed");
                AuthError::Remote
            })?;
        info!(user_id = %user.id, "password changed");
        Ok(())
    }

    async fn verify(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let rows = self
            .auth
            .authenticate(email, password)
            .await
            .map_err(|error| {
                warn!(%error, "authentication request failed");
                AuthError::Remote
            })?;
        rows.into_iter().next().ok_or(AuthError::InvalidCredentials)
    }

    async fn remember(&self, user: AuthenticatedUser) {
        match serde_json::to_string(&user) {
            Ok(raw) => {
                if let Err(error) = self.store.set(SESSION_USER_KEY, &raw).await {
                    warn!(%error, "could not persist session");
                }
            }
            Err(error) => warn!(%error, "could not encode session"),
        }
        *self.user.write().await = Some(user);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
