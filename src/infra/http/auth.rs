//! Session and JWT authentication endpoints.
//!
//! Login relays credentials upstream and establishes both cookies: an opaque
//! `SESSION_ID` backed by the in-memory store and the upstream-issued
//! `ACCESS_TOKEN` JWT. `/api/me` prefers the session and falls back to
//! verifying the JWT, re-establishing the session from its claims.

use axum::{Json, extract::State};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use crate::application::error::AppError;
use crate::domain::entities::{Credentials, MenuTreeNode};

use super::AppState;
use super::session::SessionUser;

pub const SESSION_COOKIE: &str = "SESSION_ID";
pub const TOKEN_COOKIE: &str = "ACCESS_TOKEN";

/// Claims carried by the upstream token. The name claim keeps the WS-2005
/// URI the upstream issuer writes.
#[derive(Debug, Deserialize)]
struct AccessClaims {
    #[serde(rename = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name")]
    name: String,
    #[serde(rename = "companyID", default)]
    company_id: Option<i64>,
    #[serde(rename = "userMenu", default)]
    user_menu: Vec<MenuTreeNode>,
}

#[derive(Debug, Serialize)]
pub struct AuthAck {
    pub success: bool,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<AuthAck>), AppError> {
    let grant = state.auth.login(&credentials).await?;

    let user = SessionUser {
        username: grant.username.clone(),
        company_id: grant.company_id,
        user_menu: grant.user_menu.clone(),
    };
    let token = state.sessions.issue(user);

    let jar = jar
        .add(session_cookie(token))
        .add(access_cookie(grant.token, grant.expiration));
    Ok((jar, Json(AuthAck { success: true })))
}

pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SessionUser>), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(user) = state.sessions.resolve(cookie.value()) {
            return Ok((jar, Json(user)));
        }
    }

    let access = jar.get(TOKEN_COOKIE).ok_or(AppError::Unauthorized)?;
    let user = verify_access_token(access.value(), &state.jwt_secret)?;

    debug!(username = %user.username, "session re-established from access token");
    let token = state.sessions.issue(user.clone());
    Ok((jar.add(session_cookie(token)), Json(user)))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<AuthAck>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.revoke(cookie.value());
    }
    let jar = jar
        .remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
        .remove(Cookie::build((TOKEN_COOKIE, "")).path("/").build());
    (jar, Json(AuthAck { success: true }))
}

/// Resolve the caller's session or reject with 401.
pub fn authenticated_user(state: &AppState, jar: &CookieJar) -> Result<SessionUser, AppError> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(AppError::Unauthorized)?;
    state
        .sessions
        .resolve(cookie.value())
        .ok_or(AppError::Unauthorized)
}

/// Menu-based permission gate for admin writes.
pub fn require_permission(user: &SessionUser, path: &str) -> Result<(), AppError> {
    if user.can(path) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn verify_access_token(token: &str, secret: &str) -> Result<SessionUser, AppError> {
    let claims = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|error| {
        debug!(%error, "access token rejected");
        AppError::Unauthorized
    })?
    .claims;

    Ok(SessionUser {
        username: claims.name,
        company_id: claims.company_id,
        user_menu: claims.user_menu,
    })
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn access_cookie(token: String, expiration: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .expires(expiration)
        .build()
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    use super::*;

    const SECRET: &str = "test-secret";
    const NAME_CLAIM: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";

    fn token(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_session_user() {
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        let token = token(json!({
            NAME_CLAIM: "admin",
            "companyID": 4,
            "userMenu": [{"id": 1, "menuName": "Products", "path": "/admin/products"}],
            "exp": exp,
        }));

        let user = verify_access_token(&token, SECRET).unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.company_id, Some(4));
        assert!(user.can("/admin/products"));
    }

    #[test]
    fn expired_token_is_rejected() {
        let exp = OffsetDateTime::now_utc().unix_timestamp() - 3600;
        let token = token(json!({ NAME_CLAIM: "admin", "exp": exp }));

        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        let token = token(json!({ NAME_CLAIM: "admin", "exp": exp }));

        assert!(verify_access_token(&token, "other-secret").is_err());
    }
}
