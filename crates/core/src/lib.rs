//! `userhub-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no HTTP or storage
//! concerns): the user record, its identifier, input validation, and the
//! domain error taxonomy.

pub mod error;
pub mod id;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use user::{NewUser, User, UserPatch};
