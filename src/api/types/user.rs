//! User request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::User;

/// Body of `POST /users`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            name: user.name().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Body of `POST /test/setup-users`
#[derive(Debug, Clone, Deserialize)]
pub struct SetupUsersRequest {
    pub users: Vec<CreateUserRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupUsersResponse {
    pub status: String,
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearUsersResponse {
    pub status: String,
}
