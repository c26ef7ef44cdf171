use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::authz::Role;

// --- Directory Records ---

/// User
///
/// An account held in the user directory. The password is only ever stored as an
/// encoded hash and is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            roles: roles.into_iter().collect(),
            created_at: Utc::now(),
        }
    }
}

// --- Request Payloads ---

/// SignupRequest
///
/// Input payload for `POST /user/signup`. New accounts always receive the `USER` role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "alice")]
    pub username: String,
    pub password: String,
}

// --- Responses ---

/// UserProfile
///
/// The public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            roles: user.roles.into_iter().collect(),
            created_at: user.created_at,
        }
    }
}

/// AdminDashboard
///
/// Output schema for `GET /admin/dashboard`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AdminDashboard {
    pub total_users: usize,
    pub admins: usize,
    pub members: usize,
}

/// PageMessage
///
/// Body returned by the informational pages (`/`, `/main`, `/auth/login`, `/auth/fail`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageMessage {
    pub page: String,
    pub message: String,
}

impl PageMessage {
    pub fn new(page: &str, message: &str) -> Self {
        Self {
            page: page.to_string(),
            message: message.to_string(),
        }
    }
}
