use std::env;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha512};
use time::Duration;
use tower_sessions::{
    cookie::{Key, SameSite},
    service::SignedCookie,
    Expiry, SessionManagerLayer, SessionStore,
};
use tracing::warn;

use crate::error::{AppError, Result};

/// Signed session layer over whichever store backs the sessions.
pub type SessionLayer<S> = SessionManagerLayer<S, SignedCookie>;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub expiry: Duration,
    pub name: String,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        if current_environment() == "production" {
            Self::production()
        } else {
            Self::development()
        }
    }

    pub fn production() -> Self {
        SessionConfig {
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
            expiry: Duration::hours(2),
            name: "__Host-session".to_string(),
        }
    }

    pub fn development() -> Self {
        SessionConfig {
            secure: false,
            http_only: true,
            same_site: SameSite::Lax,
            expiry: Duration::days(7),
            name: "session".to_string(),
        }
    }

    pub fn create_layer<S>(&self, store: S) -> SessionLayer<S>
    where
        S: SessionStore + Clone,
    {
        let key = load_session_key();

        SessionManagerLayer::new(store)
            .with_secure(self.secure)
            .with_http_only(self.http_only)
            .with_same_site(self.same_site)
            .with_name(self.name.clone())
            .with_expiry(Expiry::OnInactivity(self.expiry))
            .with_signed(key)
    }
}

/// Refuses to start a production server with HTTP cookies or a weak secret.
pub fn validate_production_config() -> Result<()> {
    if current_environment() != "production" {
        return Ok(());
    }

    if !env_flag_enabled("FORCE_HTTPS") {
        return Err(AppError::Config(
            "Production environment requires HTTPS. Set FORCE_HTTPS=true".to_string(),
        ));
    }

    let secret = env::var("SESSION_SECRET")
        .map_err(|_| AppError::Config("SESSION_SECRET must be set in production".to_string()))?;
    let decoded_secret = decode_secret_bytes(&secret);

    if decoded_secret.len() < 64 {
        return Err(AppError::Config(
            "SESSION_SECRET must be at least 64 bytes in production".to_string(),
        ));
    }

    let lowered = secret.to_ascii_lowercase();
    if lowered.contains("example") || lowered.contains("changeme") || lowered.contains("default") {
        return Err(AppError::Config(
            "SESSION_SECRET appears to be a default value. Generate a secure secret!".to_string(),
        ));
    }

    Ok(())
}

fn current_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

fn env_flag_enabled(key: &str) -> bool {
    env::var(key)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false)
}

fn load_session_key() -> Key {
    match env::var("SESSION_SECRET") {
        Ok(secret) if !secret.is_empty() => {
            let bytes = decode_secret_bytes(&secret);
            key_from_secret_bytes(&bytes)
        }
        _ => {
            warn!("SESSION_SECRET not set; generating ephemeral key (development only)");
            Key::generate()
        }
    }
}

fn decode_secret_bytes(secret: &str) -> Vec<u8> {
    STANDARD
        .decode(secret.as_bytes())
        .unwrap_or_else(|_| secret.as_bytes().to_vec())
}

fn key_from_secret_bytes(bytes: &[u8]) -> Key {
    if bytes.len() >= 64 {
        Key::from(&bytes[..64])
    } else {
        let digest = Sha512::digest(bytes);
        Key::from(digest.as_slice())
    }
}
