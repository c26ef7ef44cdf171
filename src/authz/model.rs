use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role
///
/// The closed set of role tags a caller may hold. Adding a variant forces every
/// exhaustive match over roles to be revisited.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("ADMIN"),
            Role::User => f.write_str("USER"),
        }
    }
}

/// Requirement
///
/// What a matched rule demands of the caller. In a rules file these appear as
/// `"public"`, `"authenticated"` or `{ "role": "ADMIN" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Public,
    Authenticated,
    Role(Role),
}

impl Requirement {
    /// Applies this requirement to a caller.
    pub fn verdict_for(&self, auth: &AuthState) -> Verdict {
        match (self, auth) {
            (Requirement::Public, _) => Verdict::Allow,
            (_, AuthState::Anonymous) => Verdict::DenyUnauthenticated,
            (Requirement::Authenticated, AuthState::Authenticated(_)) => Verdict::Allow,
            (Requirement::Role(role), AuthState::Authenticated(roles)) => {
                if roles.contains(role) {
                    Verdict::Allow
                } else {
                    Verdict::DenyForbidden
                }
            }
        }
    }

    /// The role named by this requirement, if any.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Requirement::Role(role) => Some(*role),
            _ => None,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Public => f.write_str("public"),
            Requirement::Authenticated => f.write_str("authenticated"),
            Requirement::Role(role) => write!(f, "role({role})"),
        }
    }
}

/// AuthState
///
/// The caller's authentication state for one request. Built by the front end from
/// whatever the authenticator resolved and dropped once the verdict is known.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(BTreeSet<Role>),
}

impl AuthState {
    pub fn authenticated(roles: impl IntoIterator<Item = Role>) -> Self {
        AuthState::Authenticated(roles.into_iter().collect())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn has_role(&self, role: Role) -> bool {
        match self {
            AuthState::Anonymous => false,
            AuthState::Authenticated(roles) => roles.contains(&role),
        }
    }
}

/// Verdict
///
/// The outcome of evaluating one request. Denials are ordinary results: the HTTP
/// layer turns `DenyUnauthenticated` into a challenge and `DenyForbidden` into a 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    DenyUnauthenticated,
    DenyForbidden,
}
