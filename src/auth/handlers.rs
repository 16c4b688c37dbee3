use crate::auth::session::{is_logged_in, mark_logged_in};
use crate::notice::{
    redirect_with_notice, ACCOUNT_CREATED, EMAIL_TAKEN, INVALID_CREDENTIALS, LOGGED_OUT,
    LOGIN_FAILED, MISSING_FIELDS, REGISTER_FAILED,
};
use crate::services::{
    auth_service::{AuthServiceError, LoginRequest},
    user_service::{CreateUserRequest, UserServiceError},
};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{rejection::FormRejection, Form, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{debug, error, info, warn};

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    mensagem: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    mensagem: Option<String>,
}

// Absent fields deserialize as empty strings.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default, alias = "nome")]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default, alias = "senha")]
    password: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default, alias = "senha")]
    password: String,
}

#[derive(Deserialize)]
pub struct NoticeQuery {
    mensagem: Option<String>,
}

/// GET /register
pub async fn register_page(Query(query): Query<NoticeQuery>) -> impl IntoResponse {
    RegisterTemplate {
        mensagem: query.mensagem,
    }
}

/// GET /login
pub async fn login_page(Query(query): Query<NoticeQuery>) -> impl IntoResponse {
    LoginTemplate {
        mensagem: query.mensagem,
    }
}

/// GET /
pub async fn index_handler(session: Session) -> Redirect {
    if is_logged_in(&session).await {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

/// POST /register
pub async fn register_handler(
    State(app_state): State<AppState>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Redirect {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable registration form");
            return redirect_with_notice("/register", REGISTER_FAILED);
        }
    };

    let request = CreateUserRequest {
        name: form.name,
        email: form.email,
        password: form.password,
    };

    match app_state.user_service.create_user(request).await {
        Ok(user) => {
            info!(user_id = user.id, "account created");
            redirect_with_notice("/login", ACCOUNT_CREATED)
        }
        Err(UserServiceError::EmailTaken) => {
            debug!("registration rejected: email already registered");
            redirect_with_notice("/register", EMAIL_TAKEN)
        }
        Err(UserServiceError::MissingFields) => redirect_with_notice("/register", MISSING_FIELDS),
        Err(err) => {
            error!(error = %err, "failed to register user");
            redirect_with_notice("/register", REGISTER_FAILED)
        }
    }
}

/// POST /login
pub async fn login_handler(
    State(app_state): State<AppState>,
    session: Session,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Redirect {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable login form");
            return redirect_with_notice("/login", LOGIN_FAILED);
        }
    };

    let request = LoginRequest {
        email: form.email,
        password: form.password,
    };

    match app_state.auth_service.authenticate(request).await {
        Ok(user) => {
            if let Err(err) = mark_logged_in(&session, &user).await {
                error!(error = %err, user_id = user.id, "failed to write login session");
                return redirect_with_notice("/login", LOGIN_FAILED);
            }
            info!(user_id = user.id, "user logged in");
            Redirect::to("/dashboard")
        }
        Err(AuthServiceError::InvalidCredentials) => {
            debug!("login rejected: invalid credentials");
            redirect_with_notice("/login", INVALID_CREDENTIALS)
        }
        Err(err) => {
            error!(error = %err, "failed to authenticate user");
            redirect_with_notice("/login", LOGIN_FAILED)
        }
    }
}

/// GET /logout
pub async fn logout_handler(session: Session) -> Redirect {
    match session.flush().await {
        Ok(()) => redirect_with_notice("/login", LOGGED_OUT),
        Err(err) => {
            error!(error = %err, "failed to destroy session");
            Redirect::to("/dashboard")
        }
    }
}
