//! Request DTOs and JSON mapping helpers.

use serde::{Deserialize, Deserializer};
use serde_json::json;

use userhub_core::{NewUser, User, UserPatch};

// Required fields are optional here so that absence reaches validation
// ("Name is required") instead of dying in the deserializer.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            age: req.age,
        }
    }
}

/// Partial update body. An absent field is "leave unchanged"; `age` also
/// accepts an explicit `null` meaning "clear", hence the double `Option`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub age: Option<Option<i64>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            age: req.age,
        }
    }
}

pub fn user_to_json(user: &User) -> serde_json::Value {
    json!({
        "id": user.id.to_string(),
        "name": user.name,
        "email": user.email,
        "age": user.age,
        "createdAt": user.created_at.to_rfc3339(),
    })
}
