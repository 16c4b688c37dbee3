use crate::models::user::User;
use tower_sessions::{session, Session};
use tracing::warn;

pub const IS_LOGGED_IN_KEY: &str = "is_logged_in";
pub const USER_ID_KEY: &str = "user_id";
pub const NAME_KEY: &str = "name";

/// Records a successful login in the session.
pub async fn mark_logged_in(session: &Session, user: &User) -> Result<(), session::Error> {
    session.insert(IS_LOGGED_IN_KEY, true).await?;
    session.insert(USER_ID_KEY, user.id).await?;
    session.insert(NAME_KEY, user.name.as_str()).await?;
    Ok(())
}

/// A session that cannot be read counts as logged out.
pub async fn is_logged_in(session: &Session) -> bool {
    match session.get::<bool>(IS_LOGGED_IN_KEY).await {
        Ok(flag) => flag.unwrap_or(false),
        Err(err) => {
            warn!(error = %err, "failed to read session login flag");
            false
        }
    }
}

pub async fn display_name(session: &Session) -> Result<Option<String>, session::Error> {
    session.get::<String>(NAME_KEY).await
}
