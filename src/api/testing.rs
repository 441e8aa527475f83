//! Store fixtures for end-to-end test runs
//!
//! Mounted only when `testing.enabled` is set.

use axum::extract::State;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, ClearUsersResponse, Json, SetupUsersRequest, SetupUsersResponse,
};
use crate::domain::User;

/// POST /test/setup-users
///
/// Valid users are merged into the store in one step, replacing users with
/// the same id. Existing users are kept.
pub async fn setup_users(
    State(state): State<AppState>,
    Json(request): Json<SetupUsersRequest>,
) -> Result<Json<SetupUsersResponse>, ApiError> {
    let mut users = Vec::with_capacity(request.users.len());
    let mut skipped = 0;

    for entry in request.users {
        match User::with_policy(entry.id, &entry.name, entry.email, state.email_policy.as_ref()) {
            Ok(user) => users.push(user),
            Err(e) => {
                warn!(user_id = entry.id, error = %e, "Skipping invalid test user");
                skipped += 1;
            }
        }
    }

    let loaded = state.user_service.merge_users(users, false)?;
    info!(loaded, skipped, "Test users set");

    Ok(Json(SetupUsersResponse {
        status: "users_set".to_string(),
        loaded,
        skipped,
    }))
}

/// POST /test/clear-users
pub async fn clear_users(
    State(state): State<AppState>,
) -> Result<Json<ClearUsersResponse>, ApiError> {
    let removed = state.user_service.clear()?;
    info!(removed, "Test users cleared");

    Ok(Json(ClearUsersResponse {
        status: "cleared".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::types::CreateUserRequest;
    use crate::domain::user::StrictEmailPolicy;
    use crate::infrastructure::user::UserService;

    fn entry(id: i64, name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            id,
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_setup_users_merges_and_counts_skips() {
        let service = Arc::new(UserService::new());
        service
            .add_user(User::new(9, "Saul Goodman", "saul@example.com").unwrap())
            .unwrap();
        let state = AppState::new(service.clone(), Arc::new(StrictEmailPolicy));

        let request = SetupUsersRequest {
            users: vec![
                entry(1, "Walter White", "walter@example.com"),
                entry(2, "Bob", "bob@example.com"),
                entry(9, "Jimmy McGill", "jimmy@example.com"),
            ],
        };

        let Json(response) = setup_users(State(state), Json(request)).await.unwrap();

        assert_eq!(response.status, "users_set");
        assert_eq!(response.loaded, 2);
        assert_eq!(response.skipped, 1);
        assert_eq!(service.len().unwrap(), 2);
        assert_eq!(service.get_user(9).unwrap().unwrap().name(), "Jimmy McGill");
    }

    #[tokio::test]
    async fn test_clear_users() {
        let service = Arc::new(UserService::new());
        service
            .add_user(User::new(1, "Walter White", "walter@example.com").unwrap())
            .unwrap();
        let state = AppState::new(service.clone(), Arc::new(StrictEmailPolicy));

        let Json(response) = clear_users(State(state)).await.unwrap();

        assert_eq!(response.status, "cleared");
        assert!(service.is_empty().unwrap());
    }
}
