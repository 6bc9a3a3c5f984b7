//! # In-Memory User Directory
//!
//! In-memory implementation of [`UserDirectory`].

use crate::domain::entities::User;
use crate::domain::value_objects::UserId;
use crate::infrastructure::identity::error::IdentityResult;
use crate::infrastructure::identity::traits::UserDirectory;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`UserDirectory`].
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    storage: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user.
    pub async fn insert(&self, user: User) {
        let mut storage = self.storage.write().await;
        storage.insert(user.id(), user);
    }

    /// Finds a user by email, ignoring case.
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let storage = self.storage.read().await;
        storage
            .values()
            .find(|user| user.email().eq_ignore_ascii_case(email))
            .cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get(&self, id: &UserId) -> IdentityResult<Option<User>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn count(&self) -> IdentityResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}
