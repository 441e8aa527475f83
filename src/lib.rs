//! User Registry API
//!
//! An in-memory user store with:
//! - Validated user records
//! - Atomic bulk import from and export to JSON snapshot files
//! - An HTTP API for creating, reading, listing and deleting users

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::user::UserService;

/// Create application state from configuration
///
/// The store starts empty; preloading is up to the caller.
pub fn create_app_state(config: &AppConfig) -> AppState {
    let user_service = Arc::new(UserService::new());
    let email_policy = config.validation.email_policy.build();

    AppState::new(user_service, email_policy)
}
