//! Status messages shown on the login and registration pages.
//!
//! Messages travel as the `mensagem` query parameter of a redirect so that a
//! page render never depends on server-side flash state.

use axum::response::Redirect;

pub const NOTICE_PARAM: &str = "mensagem";

pub const ACCOUNT_CREATED: &str = "Account created successfully! Please log in.";
pub const EMAIL_TAKEN: &str = "Email already registered.";
pub const MISSING_FIELDS: &str = "All fields are required.";
pub const REGISTER_FAILED: &str = "Could not create account.";
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password.";
pub const LOGIN_FAILED: &str = "Could not log in.";
pub const LOGIN_REQUIRED: &str = "Please log in.";
pub const LOGGED_OUT: &str = "You have been logged out.";

/// Builds `path?mensagem=<encoded text>`.
pub fn notice_url(path: &str, text: &str) -> String {
    format!("{}?{}={}", path, NOTICE_PARAM, urlencoding::encode(text))
}

pub fn redirect_with_notice(path: &str, text: &str) -> Redirect {
    Redirect::to(&notice_url(path, text))
}
