//! User endpoints

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, CreateUserRequest, Json, UserResponse};
use crate::domain::User;

fn user_id_from_path(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(user_id)| user_id).map_err(|rejection| {
        ApiError::bad_request(format!("Invalid user id: {}", rejection.body_text()))
            .with_code("invalid_user_id")
    })
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    debug!("Listing all users");

    let users = state.user_service.list_users()?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!(user_id = request.id, name = %request.name, "Creating user");

    let user = User::with_policy(
        request.id,
        &request.name,
        request.email,
        state.email_policy.as_ref(),
    )?;
    let response = UserResponse::from(&user);

    state.user_service.add_user(user)?;
    info!(user_id = response.id, "User created via API");

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = user_id_from_path(path)?;
    debug!(user_id, "Getting user");

    let user = state
        .user_service
        .get_user(user_id)?
        .ok_or_else(|| ApiError::not_found(format!("User with ID {} not found", user_id)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let user_id = user_id_from_path(path)?;
    debug!(user_id, "Deleting user");

    state.user_service.remove_user_by_id(user_id)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::types::ApiErrorType;
    use crate::domain::user::{PermissiveEmailPolicy, StrictEmailPolicy};
    use crate::infrastructure::user::UserService;

    fn state_with_strict_policy() -> AppState {
        AppState::new(Arc::new(UserService::new()), Arc::new(StrictEmailPolicy))
    }

    fn walter() -> CreateUserRequest {
        CreateUserRequest {
            id: 1,
            name: "Walter White".to_string(),
            email: "walter@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_returns_created() {
        let state = state_with_strict_policy();

        let (status, Json(user)) = create_user(State(state.clone()), Json(walter()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Walter White");
        assert_eq!(state.user_service.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_user_is_conflict() {
        let state = state_with_strict_policy();
        create_user(State(state.clone()), Json(walter())).await.unwrap();

        let mut again = walter();
        again.name = "Walter Hartwell White".to_string();
        let err = create_user(State(state.clone()), Json(again))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.response.error.error_type, ApiErrorType::ConflictError);
        assert_eq!(
            state.user_service.get_user(1).unwrap().unwrap().name(),
            "Walter White"
        );
    }

    #[tokio::test]
    async fn test_create_invalid_user_is_unprocessable() {
        let state = state_with_strict_policy();
        let request = CreateUserRequest {
            id: 2,
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
        };

        let err = create_user(State(state.clone()), Json(request))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.user_service.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_email_policy_applies_at_boundary() {
        let request = || CreateUserRequest {
            id: 3,
            name: "Skyler White".to_string(),
            email: "skyler-at-example".to_string(),
        };

        let strict = state_with_strict_policy();
        let err = create_user(State(strict), Json(request()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let permissive = AppState::new(Arc::new(UserService::new()), Arc::new(PermissiveEmailPolicy));
        let (status, _) = create_user(State(permissive), Json(request()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let state = state_with_strict_policy();

        let err = get_user(State(state), Ok(Path(99))).await.unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.response.error.message, "User with ID 99 not found");
    }

    #[tokio::test]
    async fn test_delete_user() {
        let state = state_with_strict_policy();
        create_user(State(state.clone()), Json(walter())).await.unwrap();

        let status = delete_user(State(state.clone()), Ok(Path(1))).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = delete_user(State(state), Ok(Path(1))).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_users_in_insertion_order() {
        let state = state_with_strict_policy();
        for (id, name) in [(5, "Hank Schrader"), (2, "Marie Schrader")] {
            let request = CreateUserRequest {
                id,
                name: name.to_string(),
                email: format!("user{}@example.com", id),
            };
            create_user(State(state.clone()), Json(request)).await.unwrap();
        }

        let Json(users) = list_users(State(state)).await.unwrap();

        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![5, 2]);
    }
}
