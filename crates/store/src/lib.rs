//! Data access layer for user records.
//!
//! `UserStore` is the seam between the HTTP handlers and persistence. The
//! default implementation is in-memory ([`memory::InMemoryUserStore`]); a
//! Postgres-backed twin lives behind the `postgres` feature
//! ([`postgres::PgUserStore`]).

use std::sync::Arc;

use async_trait::async_trait;

use userhub_core::{DomainResult, NewUser, User, UserId, UserPatch};

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::InMemoryUserStore;
#[cfg(feature = "postgres")]
pub use postgres::PgUserStore;

/// Unique-id-addressed collection of user records.
///
/// Implementations enforce email uniqueness (case-insensitive; emails are
/// normalized to lowercase before they reach the store) and assign `id` and
/// `created_at` at creation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, ordered by `created_at` descending. Unbounded.
    async fn list(&self) -> DomainResult<Vec<User>>;

    /// The matching user, or `DomainError::NotFound`.
    async fn get(&self, id: UserId) -> DomainResult<User>;

    /// Validate, assign identity and creation timestamp, persist.
    ///
    /// `DomainError::Conflict` when the email is already taken,
    /// `DomainError::Validation` on any constraint violation.
    async fn create(&self, fields: NewUser) -> DomainResult<User>;

    /// Merge only the supplied fields over the existing record, revalidate,
    /// persist. Same failure modes as [`UserStore::create`], plus
    /// `DomainError::NotFound` when the record is absent.
    async fn update(&self, id: UserId, patch: UserPatch) -> DomainResult<User>;

    /// Remove the record permanently. `DomainError::NotFound` when absent.
    async fn delete(&self, id: UserId) -> DomainResult<()>;
}

#[async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn list(&self) -> DomainResult<Vec<User>> {
        (**self).list().await
    }

    async fn get(&self, id: UserId) -> DomainResult<User> {
        (**self).get(id).await
    }

    async fn create(&self, fields: NewUser) -> DomainResult<User> {
        (**self).create(fields).await
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> DomainResult<User> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: UserId) -> DomainResult<()> {
        (**self).delete(id).await
    }
}
