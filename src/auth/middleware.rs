use crate::auth::session::is_logged_in;
use crate::notice::{redirect_with_notice, LOGIN_REQUIRED};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

pub async fn require_auth(session: Session, request: Request, next: Next) -> Response {
    if is_logged_in(&session).await {
        next.run(request).await
    } else {
        redirect_with_notice("/login", LOGIN_REQUIRED).into_response()
    }
}
