//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::EmailPolicy;
use crate::infrastructure::user::UserService;

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    /// Applied to emails arriving over HTTP
    pub email_policy: Arc<dyn EmailPolicy>,
}

impl AppState {
    pub fn new(user_service: Arc<UserService>, email_policy: Arc<dyn EmailPolicy>) -> Self {
        Self {
            user_service,
            email_policy,
        }
    }
}
