use crate::auth::password::{hash_password_async, PasswordError};
use crate::models::user::User;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Name, email and password are required")]
    MissingFields,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Registers a new account.
    ///
    /// The existence check and the insert are separate statements; two
    /// concurrent registrations for one email are settled by the unique
    /// index, and the loser sees `EmailTaken` as well.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserServiceError> {
        if request.name.is_empty() || request.email.is_empty() || request.password.is_empty() {
            return Err(UserServiceError::MissingFields);
        }

        if self
            .repository
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(UserServiceError::EmailTaken);
        }

        let password_hash = hash_password_async(request.password).await?;

        match self
            .repository
            .create_user(&request.name, &request.email, &password_hash)
            .await
        {
            Ok(user) => Ok(user),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email).await?)
    }
}
