//! Cookie-backed sessions.
//!
//! The whole session lives client-side in the `session` cookie as
//! `base64(json).base64(hmac_sha256(base64(json)))`. Anything that fails to
//! verify or decode is treated as an empty session.

use std::{convert::Infallible, sync::Arc};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ring::hmac;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::AppState;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Danger,
    Info,
}

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Success, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Danger, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Info, message)
    }

    fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Flash {
            category,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub flashes: Vec<Flash>,
}

/// HMAC key used to sign and verify session cookies.
#[derive(Clone)]
pub struct SessionKey(hmac::Key);

impl SessionKey {
    pub fn new(secret: &str) -> Self {
        SessionKey(hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()))
    }

    pub fn seal(&self, data: &SessionData) -> Result<String, serde_json::Error> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(data)?);
        let signature = hmac::sign(&self.0, payload.as_bytes());
        Ok(format!(
            "{}.{}",
            payload,
            URL_SAFE_NO_PAD.encode(signature.as_ref())
        ))
    }

    pub fn open(&self, value: &str) -> Option<SessionData> {
        let (payload, signature) = value.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        hmac::verify(&self.0, payload.as_bytes(), &signature).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

/// Per-request view of the session. Returned as a response part to persist changes.
pub struct Session {
    data: SessionData,
    key: SessionKey,
    dirty: bool,
}

impl Session {
    pub fn new(key: SessionKey, data: SessionData) -> Self {
        Session {
            data,
            key,
            dirty: false,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.data.user_id
    }

    pub fn log_in(&mut self, user_id: i64) {
        self.data.user_id = Some(user_id);
        self.dirty = true;
    }

    /// Forgets the user but keeps queued notices.
    pub fn log_out(&mut self) {
        self.data.user_id = None;
        self.dirty = true;
    }

    pub fn flash(&mut self, flash: Flash) {
        self.data.flashes.push(flash);
        self.dirty = true;
    }

    pub fn take_flashes(&mut self) -> Vec<Flash> {
        if self.data.flashes.is_empty() {
            return Vec::new();
        }
        self.dirty = true;
        std::mem::take(&mut self.data.flashes)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let key = app_state.session_key.clone();
        let jar = CookieJar::from_headers(&parts.headers);

        let data = match jar.get(SESSION_COOKIE) {
            Some(cookie) => key.open(cookie.value()).unwrap_or_else(|| {
                warn!("Discarding session cookie with an invalid signature");
                SessionData::default()
            }),
            None => SessionData::default(),
        };

        Ok(Session::new(key, data))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if !self.dirty {
            return Ok(res);
        }

        let value = match self.key.seal(&self.data) {
            Ok(value) => value,
            Err(err) => {
                error!("Failed to encode session: {}", err);
                return Ok(res);
            }
        };

        let cookie = Cookie::build(SESSION_COOKIE, value)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish();

        CookieJar::new().add(cookie).into_response_parts(res)
    }
}
