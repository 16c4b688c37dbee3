use crate::{auth, handlers, AppState};
use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

pub const STATIC_DIR: &str = "public";

/// Builds every route of the application.
///
/// The session layer is applied by the caller so the same router can run
/// over the SQLite session store or an in-memory one.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard_handler))
        .layer(middleware::from_fn(auth::middleware::require_auth));

    Router::new()
        .route("/", get(auth::handlers::index_handler))
        .route(
            "/login",
            get(auth::handlers::login_page).post(auth::handlers::login_handler),
        )
        .route(
            "/register",
            get(auth::handlers::register_page).post(auth::handlers::register_handler),
        )
        .route("/logout", get(auth::handlers::logout_handler))
        .merge(protected_routes)
        // Static files
        .fallback_service(ServeDir::new(STATIC_DIR))
        .layer(middleware::from_fn(add_security_headers))
        .with_state(state)
}

pub async fn add_security_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self'; \
             style-src 'self'; \
             img-src 'self' data:; \
             frame-ancestors 'none';",
        ),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if std::env::var("ENVIRONMENT")
        .map(|env| env == "production")
        .unwrap_or(false)
    {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}
