use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ClientId);
id_newtype!(ProcessId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pipeline stage tag as stored on a client row.
///
/// Kept as a free-form string: rows written by other tools may carry tags the
/// taxonomy does not know, and those must still load and render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusTag(pub String);

impl StatusTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StatusTag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    #[default]
    Brazil,
    Portugal,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 2] = [Jurisdiction::Brazil, Jurisdiction::Portugal];

    pub fn as_str(self) -> &'static str {
        match self {
            Jurisdiction::Brazil => "brazil",
            Jurisdiction::Portugal => "portugal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Jurisdiction::Brazil => "Brasil",
            Jurisdiction::Portugal => "Portugal",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown jurisdiction '{0}'")]
pub struct UnknownJurisdiction(pub String);

impl FromStr for Jurisdiction {
    type Err = UnknownJurisdiction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brazil" | "brasil" | "br" => Ok(Jurisdiction::Brazil),
            "portugal" | "pt" => Ok(Jurisdiction::Portugal),
            other => Err(UnknownJurisdiction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    #[serde(default)]
    pub interest: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub scheduling_done: bool,
    #[serde(default)]
    pub follow_up_done: bool,
    pub status: StatusTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Jurisdiction>,
    pub created_at: DateTime<Utc>,
}

/// Fields the plain client edit form writes back in one update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientUpdate {
    pub name: String,
    pub interest: String,
    pub notes: String,
    pub status: StatusTag,
    pub scheduling_done: bool,
    pub follow_up_done: bool,
}

impl From<&Client> for ClientUpdate {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            interest: client.interest.clone(),
            notes: client.notes.clone(),
            status: client.status.clone(),
            scheduling_done: client.scheduling_done,
            follow_up_done: client.follow_up_done,
        }
    }
}

/// Intake payload for a client created outside the pipeline views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub interest: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Jurisdiction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
