use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::authz::Role;
use crate::models::{AdminDashboard, User};

/// UserDirectory Trait
///
/// The account store consulted by the authenticator (identity and role lookup)
/// and by signup. Handlers and the authenticator only see this trait, so the
/// in-memory store can be replaced by a persistent one without touching them.
///
/// **Send + Sync + async_trait** make `Arc<dyn UserDirectory>` shareable across
/// Axum's request tasks.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Option<User>;
    async fn find_by_username(&self, username: &str) -> Option<User>;
    /// Stores a new account. Returns `None` if the username is already taken.
    async fn create_user(&self, user: User) -> Option<User>;
    async fn list_users(&self) -> Vec<User>;

    async fn get_stats(&self) -> AdminDashboard {
        let users = self.list_users().await;
        AdminDashboard {
            total_users: users.len(),
            admins: users.iter().filter(|u| u.roles.contains(&Role::Admin)).count(),
            members: users.iter().filter(|u| u.roles.contains(&Role::User)).count(),
        }
    }
}

/// DirectoryState
///
/// The concrete type used to share the directory across the application state.
pub type DirectoryState = Arc<dyn UserDirectory>;

/// InMemoryUserDirectory
///
/// A process-local directory. Accounts live for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    async fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    async fn create_user(&self, user: User) -> Option<User> {
        // Uniqueness check and insert happen under the same write guard.
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return None;
        }
        users.insert(user.id, user.clone());
        Some(user)
    }

    async fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        users
    }
}
