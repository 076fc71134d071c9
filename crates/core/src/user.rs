//! The user record and its field constraints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::UserId;

/// Minimum name length after trimming surrounding whitespace.
pub const NAME_MIN_LEN: usize = 2;

/// Inclusive age bounds.
pub const AGE_MIN: i64 = 0;
pub const AGE_MAX: i64 = 150;

/// A fully-populated user record.
///
/// Records either exist in full or not at all; there are no drafts. `id` and
/// `created_at` are assigned by the store at creation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
}

/// Partial update of a user record.
///
/// Fields left as `None` are untouched. A present `name`/`email` is always
/// validated, so an explicit empty string fails instead of clearing the
/// field. `age` is the one clearable field: `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<Option<i64>>,
}

impl User {
    /// Validate `fields` and assemble a record under a store-assigned
    /// identity and creation timestamp.
    pub fn create(fields: NewUser, id: UserId, created_at: DateTime<Utc>) -> DomainResult<Self> {
        let name = validate_name(&fields.name)?;
        let email = validate_email(&fields.email)?;
        let age = fields.age.map(validate_age).transpose()?;
        Ok(Self {
            id,
            name,
            email,
            age,
            created_at,
        })
    }

    /// Merge only the explicitly supplied fields of `patch` over this record
    /// and revalidate. Identity and creation timestamp are preserved.
    pub fn apply(&self, patch: &UserPatch) -> DomainResult<Self> {
        let name = match &patch.name {
            Some(raw) => validate_name(raw)?,
            None => self.name.clone(),
        };
        let email = match &patch.email {
            Some(raw) => validate_email(raw)?,
            None => self.email.clone(),
        };
        let age = match patch.age {
            Some(Some(raw)) => Some(validate_age(raw)?),
            Some(None) => None,
            None => self.age,
        };
        Ok(Self {
            id: self.id,
            name,
            email,
            age,
            created_at: self.created_at,
        })
    }
}

/// Trim surrounding whitespace and enforce the minimum length.
pub fn validate_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("Name is required"));
    }
    if name.chars().count() < NAME_MIN_LEN {
        return Err(DomainError::validation(
            "Name must be at least 2 characters",
        ));
    }
    Ok(name.to_string())
}

/// Lowercase the address and enforce a basic `local@domain.tld` shape.
pub fn validate_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(DomainError::validation("Email is required"));
    }
    if !has_email_shape(&email) {
        return Err(DomainError::validation("Please enter a valid email"));
    }
    Ok(email)
}

/// Enforce the inclusive [0, 150] range.
pub fn validate_age(age: i64) -> DomainResult<i64> {
    if age < AGE_MIN {
        return Err(DomainError::validation("Age must be positive"));
    }
    if age > AGE_MAX {
        return Err(DomainError::validation("Age must be realistic"));
    }
    Ok(age)
}

// Equivalent of the classic `^\S+@\S+\.\S+$` check: non-empty local part,
// exactly one `@`, a dot inside the domain, no whitespace anywhere.
fn has_email_shape(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tld)) => !head.is_empty() && !tld.is_empty(),
        None => false,
    }
}
