use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::health;
use super::state::AppState;
use super::testing;
use super::users;

/// Create the router with application state
///
/// The `/test` fixture routes are only mounted when `enable_test_routes` is set.
pub fn create_router(state: AppState, enable_test_routes: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{user_id}",
            get(users::get_user).delete(users::delete_user),
        );

    if enable_test_routes {
        router = router.nest("/test", create_test_router());
    }

    router.with_state(state).layer(TraceLayer::new_for_http())
}

fn create_test_router() -> Router<AppState> {
    Router::new()
        .route("/setup-users", post(testing::setup_users))
        .route("/clear-users", post(testing::clear_users))
}
