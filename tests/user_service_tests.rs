use gatehouse::{
    repositories::user_repository::SqliteUserRepository,
    services::{
        auth_service::{AuthService, AuthServiceError, LoginRequest},
        user_service::{CreateUserRequest, UserService, UserServiceError},
    },
    test_utils::test_helpers,
};
use std::sync::Arc;

fn create_request(name: &str, email: &str, password: &str) -> CreateUserRequest {
    CreateUserRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_create_user_success() {
    // Create isolated test database
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool));
    let service = UserService::new(repository);

    let user = service
        .create_user(create_request("Ana", "ana@x.com", "s3cret"))
        .await
        .unwrap();

    assert_eq!(user.name, "Ana");
    assert_eq!(user.email, "ana@x.com");
    assert_ne!(user.password_hash, "s3cret");
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    service
        .create_user(create_request("Ana", "duplicate@x.com", "password123"))
        .await
        .unwrap();

    let result = service
        .create_user(create_request("Bea", "duplicate@x.com", "password456"))
        .await;
    assert!(matches!(result, Err(UserServiceError::EmailTaken)));

    let count = test_helpers::count_users_with_email(&pool, "duplicate@x.com")
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_concurrent_registrations_keep_one_row() {
    // File-backed so the registrations run on separate connections
    let (pool, _file) = test_helpers::create_test_db_file().await.unwrap();
    let service = Arc::new(UserService::new(Arc::new(SqliteUserRepository::new(
        pool.clone(),
    ))));

    let first = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .create_user(create_request("Ana", "race@x.com", "one"))
                .await
        })
    };
    let second = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .create_user(create_request("Bea", "race@x.com", "two"))
                .await
        })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(UserServiceError::EmailTaken))));

    let count = test_helpers::count_users_with_email(&pool, "race@x.com")
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_registered_user_can_authenticate() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool));
    let user_service = UserService::new(repository.clone());
    let auth_service = AuthService::new(repository);

    let created = user_service
        .create_user(create_request("Ana", "ana@x.com", "s3cret"))
        .await
        .unwrap();

    let user = auth_service
        .authenticate(LoginRequest {
            email: "ana@x.com".to_string(),
            password: "s3cret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.id, created.id);

    let result = auth_service
        .authenticate(LoginRequest {
            email: "ana@x.com".to_string(),
            password: "wrong".to_string(),
        })
        .await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_find_user_by_email() {
    let pool = test_helpers::create_test_db().await.unwrap();
    test_helpers::insert_test_user(&pool, "Ana", "ana@x.com", "s3cret")
        .await
        .unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    let found = service.find_user_by_email("ana@x.com").await.unwrap();
    assert_eq!(found.map(|u| u.name), Some("Ana".to_string()));

    let missing = service.find_user_by_email("nobody@x.com").await.unwrap();
    assert!(missing.is_none());
}
