//! In-memory user store for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use userhub_core::{DomainError, DomainResult, NewUser, User, UserId, UserPatch};

use crate::UserStore;

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    // email -> owning user; emails are stored lowercased, so a plain map
    // gives case-insensitive uniqueness.
    email_index: HashMap<String, UserId>,
}

/// In-memory store backed by a `RwLock`ed map plus an email index.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<State>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DomainError {
    DomainError::store("user store lock poisoned")
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> DomainResult<Vec<User>> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        // Newest first; UUIDv7 ids break created_at ties deterministically.
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn get(&self, id: UserId) -> DomainResult<User> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        state.users.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    async fn create(&self, fields: NewUser) -> DomainResult<User> {
        let user = User::create(fields, UserId::new(), Utc::now())?;

        let mut state = self.inner.write().map_err(|_| poisoned())?;
        if state.email_index.contains_key(&user.email) {
            return Err(DomainError::conflict(format!(
                "email already taken: {}",
                user.email
            )));
        }
        state.email_index.insert(user.email.clone(), user.id);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> DomainResult<User> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        let current = state.users.get(&id).cloned().ok_or(DomainError::NotFound)?;
        let updated = current.apply(&patch)?;

        if updated.email != current.email {
            if state.email_index.contains_key(&updated.email) {
                return Err(DomainError::conflict(format!(
                    "email already taken: {}",
                    updated.email
                )));
            }
            state.email_index.remove(&current.email);
            state.email_index.insert(updated.email.clone(), id);
        }
        state.users.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> DomainResult<()> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        let removed = state.users.remove(&id).ok_or(DomainError::NotFound)?;
        state.email_index.remove(&removed.email);
        Ok(())
    }
}
