use crate::auth::session::display_name;
use crate::error::AppError;
use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    name: String,
}

/// GET /dashboard - Show user dashboard
///
/// Mounted behind `require_auth`, so the session is known to be logged in.
pub async fn dashboard_handler(session: Session) -> Result<impl IntoResponse, AppError> {
    let name = display_name(&session)
        .await?
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(DashboardTemplate { name })
}
