use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account aggregate for the write side.
///
/// Fields are fixed at construction and only observable through the
/// accessor methods; changing a field means building a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: String,
    name: String,
    email: String,
    password: String,
    status: AccountStatus,
    created_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Builds a fully populated account.
    ///
    /// No field-level validation happens here: empty names and emails are
    /// accepted and persisted verbatim, and the password is carried as
    /// given.
    pub fn new(
        id: String,
        name: String,
        email: String,
        password: String,
        status: AccountStatus,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password,
            status,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Account lifecycle status persisted as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Activated,
    Banned,
}

impl AccountStatus {
    /// Returns the canonical string representation for the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activated => "activated",
            Self::Banned => "banned",
        }
    }

    /// Returns the integer code stored in the accounts table.
    pub fn code(self) -> i64 {
        match self {
            Self::Activated => 0,
            Self::Banned => 1,
        }
    }

    /// Decodes the stored integer code. Unknown codes map to `Banned`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Activated,
            _ => Self::Banned,
        }
    }

    /// Parses a status from free-form text, ignoring case and surrounding
    /// whitespace. Anything that is not "activated" maps to `Banned`,
    /// including the empty string.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "activated" => Self::Activated,
            _ => Self::Banned,
        }
    }
}
