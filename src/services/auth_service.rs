use crate::auth::password::{verify_password_async, PasswordError};
use crate::models::user::User;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Verified against when the email is unknown. Matches no password in use.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$VE0e3g7U4HQo7gvT$9bzlJ7VRVt3xLmOo8K+urPpPXD3O1INNhZ0M0XbLzWs";

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let Some(user) = self.user_repository.find_by_email(&request.email).await? else {
            let _ = verify_password_async(request.password, DUMMY_PASSWORD_HASH.to_string()).await;
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password_async(request.password, user.password_hash.clone()).await? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(user)
    }
}
