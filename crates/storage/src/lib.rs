use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use uuid::Uuid;

use shared::{
    domain::{Client, ClientId, ClientUpdate, Jurisdiction, Member, NewClient, StatusTag, UserId},
    protocol::AuthenticatedUser,
    status,
};

mod password;

pub use password::{hash_password, verify_password};

const CLIENT_COLUMNS: &str =
    "id, name, interest, notes, scheduling_done, follow_up_done, status, destination, created_at";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateUserOutcome {
    Created(Member),
    EmailTaken,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<CreateUserOutcome> {
        let email = normalize_email(email);
        let existing = sqlx::query("SELECT 1 FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(CreateUserOutcome::EmailTaken);
        }

        let user_id = UserId::new_random();
        let password_hash = hash_password(password)?;
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, active, created_at, updated_at)
             VALUES (?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(user_id.0.to_string())
        .bind(&email)
        .bind(name.trim())
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("failed to insert user")?;

        Ok(CreateUserOutcome::Created(Member {
            id: user_id,
            email,
            name: name.trim().to_string(),
            active: true,
            created_at: now,
        }))
    }

    /// Checks an e-mail/password pair. Returns the matching user, or `None`
    /// for an unknown e-mail, a wrong password or a deactivated account.
    pub async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedUser>> {
        let row = sqlx::query(
            "SELECT id, email, name, active, password_hash FROM users WHERE email = ? AND active = 1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if !verify_password(password, &row.get::<String, _>(4))? {
            return Ok(None);
        }

        Ok(Some(AuthenticatedUser {
            id: parse_user_id(&row.get::<String, _>(0))?,
            email: row.get::<String, _>(1),
            name: row.get::<String, _>(2),
            active: row.get::<bool, _>(3),
        }))
    }

    pub async fn update_user_password(&self, user_id: UserId, new_password: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(hash_password(new_password)?)
        .bind(Utc::now())
        .bind(user_id.0.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_users(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            "SELECT id, email, name, active, created_at FROM users ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(Member {
                    id: parse_user_id(&r.get::<String, _>(0))?,
                    email: r.get::<String, _>(1),
                    name: r.get::<String, _>(2),
                    active: r.get::<bool, _>(3),
                    created_at: r.get::<DateTime<Utc>, _>(4),
                })
            })
            .collect()
    }

    pub async fn load_user(&self, user_id: UserId) -> Result<Option<Member>> {
        let row = sqlx::query("SELECT id, email, name, active, created_at FROM users WHERE id = ?")
            .bind(user_id.0.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| {
            Ok(Member {
                id: parse_user_id(&r.get::<String, _>(0))?,
                email: r.get::<String, _>(1),
                name: r.get::<String, _>(2),
                active: r.get::<bool, _>(3),
                created_at: r.get::<DateTime<Utc>, _>(4),
            })
        })
        .transpose()
    }

    pub async fn user_id_for_email(&self, email: &str) -> Result<Option<UserId>> {
        let row = sqlx::query("SELECT id FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| parse_user_id(&r.get::<String, _>(0))).transpose()
    }

    /// Updates name and e-mail, and the active flag when given. Returns
    /// `false` when no such user exists.
    pub async fn update_user(
        &self,
        user_id: UserId,
        name: &str,
        email: &str,
        active: Option<bool>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users
             SET name = ?, email = ?, active = COALESCE(?, active), updated_at = ?
             WHERE id = ?",
        )
        .bind(name.trim())
        .bind(normalize_email(email))
        .bind(active)
        .bind(Utc::now())
        .bind(user_id.0.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_user(&self, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.0.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_client(&self, client: &NewClient) -> Result<Client> {
        let status = client.status.clone().unwrap_or_else(status::intake_tag);
        let row = sqlx::query(&format!(
            "INSERT INTO clients (name, interest, notes, status, destination, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(client.name.trim())
        .bind(&client.interest)
        .bind(&client.notes)
        .bind(status.as_str())
        .bind(client.destination.map(Jurisdiction::as_str))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("failed to insert client")?;
        Ok(client_from_row(&row))
    }

    /// All clients, newest first.
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        let rows = sqlx::query(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(client_from_row).collect())
    }

    pub async fn load_client(&self, client_id: ClientId) -> Result<Option<Client>> {
        let row = sqlx::query(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?"))
            .bind(client_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(client_from_row))
    }

    pub async fn update_client_status(&self, client_id: ClientId, status: &StatusTag) -> Result<bool> {
        let result = sqlx::query("UPDATE clients SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(client_id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_client(&self, client_id: ClientId, update: &ClientUpdate) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE clients
             SET name = ?, interest = ?, notes = ?, status = ?, scheduling_done = ?, follow_up_done = ?
             WHERE id = ?",
        )
        .bind(update.name.trim())
        .bind(&update.interest)
        .bind(&update.notes)
        .bind(update.status.as_str())
        .bind(update.scheduling_done)
        .bind(update.follow_up_done)
        .bind(client_id.0)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn client_from_row(r: &SqliteRow) -> Client {
    Client {
        id: ClientId(r.get::<i64, _>(0)),
        name: r.get::<String, _>(1),
        interest: r.get::<String, _>(2),
        notes: r.get::<String, _>(3),
        scheduling_done: r.get::<bool, _>(4),
        follow_up_done: r.get::<bool, _>(5),
        status: StatusTag::new(r.get::<String, _>(6)),
        destination: r
            .get::<Option<String>, _>(7)
            .and_then(|raw| raw.parse::<Jurisdiction>().ok()),
        created_at: r.get::<DateTime<Utc>, _>(8),
    }
}

fn parse_user_id(raw: &str) -> Result<UserId> {
    Uuid::parse_str(raw)
        .map(UserId)
        .with_context(|| format!("corrupt user id '{raw}'"))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
