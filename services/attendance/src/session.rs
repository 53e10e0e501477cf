//! Signed session cookie: a short-lived HS256 JWT carrying user id and role.
//! The signing secret is injected configuration (`SESSION_SECRET`), never a
//! compiled-in constant.

use std::time::{SystemTime, UNIX_EPOCH};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::Duration;
use uuid::Uuid;

use rollcall_domain::role::Role;

use crate::error::AttendanceServiceError;

/// Cookie name for the session token.
pub const SESSION_COOKIE: &str = "rollcall_session";

/// Session JWT lifetime in seconds (4 hours).
pub const SESSION_TTL_SECS: u64 = 14400;

/// JWT claims for the session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: u8,
    pub exp: u64,
}

/// Validated session identity, extracted from the cookie on every
/// protected route.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
}

impl Session {
    /// Pull and validate the session token from the cookie jar.
    pub fn from_jar(jar: &CookieJar, secret: &str) -> Result<Self, AttendanceServiceError> {
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_owned())
            .ok_or(AttendanceServiceError::InvalidSession)?;
        validate_session_token(&token, secret)
    }

    /// Require an exact role match.
    pub fn require(self, role: Role) -> Result<Self, AttendanceServiceError> {
        if self.role != role {
            return Err(AttendanceServiceError::Forbidden);
        }
        Ok(self)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_session_token(
    user_id: Uuid,
    role: Role,
    secret: &str,
) -> Result<String, AttendanceServiceError> {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        role: role.as_u8(),
        exp: now_secs() + SESSION_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AttendanceServiceError::Internal(e.into()))
}

/// Validate signature and expiry, returning the session identity.
pub fn validate_session_token(
    token: &str,
    secret: &str,
) -> Result<Session, AttendanceServiceError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AttendanceServiceError::InvalidSession)?;

    let user_id = data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AttendanceServiceError::InvalidSession)?;
    let role = Role::from_u8(data.claims.role).ok_or(AttendanceServiceError::InvalidSession)?;

    Ok(Session { user_id, role })
}

/// Set the session cookie on the jar.
pub fn set_session_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(SESSION_TTL_SECS as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the session cookie by setting Max-Age to 0.
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
