pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notice;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::user_service::UserService>,
    pub auth_service: Arc<services::auth_service::AuthService>,
}

impl AppState {
    /// Wires both services over one shared repository.
    pub fn new(user_repository: Arc<dyn repositories::UserRepository>) -> Self {
        Self {
            user_service: Arc::new(services::user_service::UserService::new(
                user_repository.clone(),
            )),
            auth_service: Arc::new(services::auth_service::AuthService::new(user_repository)),
        }
    }
}
