// ============================
// crates/backend-lib/src/auth/handlers.rs
// ============================
//! Session endpoint logic: login, register, refresh and logout.
//!
//! From the client's point of view a session is either Anonymous (no valid
//! access token) or Authenticated (valid token bound to a stored user).
//! Login and register move a client to Authenticated; refresh keeps
//! whatever identity the presented token proves, or mints an anonymous one;
//! logout drops back to no cookies at all.
use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use axum::Json;
use tracing::{debug, warn};
use uuid::Uuid;

use gatehouse_common::{
    CurrentUser, LoginResponse, LogoutResponse, PreflightResponse, RefreshResponse,
    RegisterResponse, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
};

use crate::auth::cookie::{build_clear_cookie, build_set_cookie, cookie_value, CookieOptions};
use crate::auth::password::{hash_password_secure, verify_password};
use crate::auth::token::SessionPayload;
use crate::error::AppError;
use crate::store::UserStore;
use crate::validation;
use crate::AppState;

/// `POST /auth/login`
pub async fn login<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<(HeaderMap, Json<LoginResponse>), AppError> {
    let body = validation::parse_json_body(&body)?;
    let req = validation::validate_credentials(&body)?;

    let candidates = state.store.find_by_email(&req.db_name, &req.email).await?;
    let user = candidates
        .into_iter()
        .find(|record| verify_password(&record.password_hash, &req.password))
        .ok_or(AppError::AuthForbidden)?;

    let payload = SessionPayload {
        db_name: req.db_name.clone(),
        uid: user.id,
        email: Some(req.email.clone()),
        display_name: Some(req.email),
        anonymous: false,
    };

    let (headers, current_user) = issue_session(&state, &payload)?;
    debug!(db_name = %req.db_name, uid = %current_user.uid, "login ok");

    Ok((
        headers,
        Json(LoginResponse {
            login_ok: true,
            db_name: req.db_name,
            current_user,
        }),
    ))
}

/// `POST /auth/register`
///
/// Creation is unconditional; a duplicate email registers a second,
/// independent identity rather than failing.
pub async fn register<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<(HeaderMap, Json<RegisterResponse>), AppError> {
    let body = validation::parse_json_body(&body)?;
    let req = validation::validate_credentials(&body)?;

    let mut password = req.password;
    let password_hash =
        hash_password_secure(&mut password).map_err(|err| AppError::Internal(err.to_string()))?;

    let uid = state
        .store
        .insert_user(&req.db_name, &req.email, &password_hash)
        .await?;

    let payload = SessionPayload {
        db_name: req.db_name.clone(),
        uid,
        email: Some(req.email.clone()),
        display_name: Some(req.email),
        anonymous: false,
    };

    let (headers, current_user) = issue_session(&state, &payload)?;
    debug!(db_name = %req.db_name, uid = %current_user.uid, "registered new user");

    Ok((
        headers,
        Json(RegisterResponse {
            register_ok: true,
            db_name: req.db_name,
            current_user,
        }),
    ))
}

/// `POST /auth/refresh`
///
/// Always ends in a usable session. A verifiable refresh or access cookie
/// keeps its identity; anything else, including a corrupt or expired
/// token, degrades to a fresh anonymous identity rather than an error.
pub async fn refresh<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(HeaderMap, Json<RefreshResponse>), AppError> {
    let body = validation::parse_json_body(&body)?;
    let requested_db = validation::validate_refresh(&body, &query)?;

    let cookie_header = headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    let presented = cookie_value(cookie_header, REFRESH_TOKEN_COOKIE)
        .or_else(|| cookie_value(cookie_header, ACCESS_TOKEN_COOKIE));

    let (payload, bootstrapped) = match presented {
        Some(token) => match state.tokens.verify(token) {
            Ok(claims) => {
                debug!(uid = %claims.uid, db_name = %claims.db_name, "propagating session claims");
                (claims, false)
            }
            Err(err) => {
                warn!(%err, "session token rejected during refresh, starting anonymous session");
                (anonymous_payload(&requested_db), true)
            }
        },
        None => (anonymous_payload(&requested_db), true),
    };

    let opts = CookieOptions::default();
    let mut out = HeaderMap::new();

    let access = state.tokens.sign_access(&payload)?;
    append_cookie(
        &mut out,
        build_set_cookie(ACCESS_TOKEN_COOKIE, &access, &opts),
    )?;

    if bootstrapped {
        let refresh = state.tokens.sign_refresh(&payload)?;
        append_cookie(
            &mut out,
            build_set_cookie(REFRESH_TOKEN_COOKIE, &refresh, &opts),
        )?;
    }

    let db_name = payload.db_name.clone();
    let current_user = current_user_from(payload);

    Ok((
        out,
        Json(RefreshResponse {
            refresh_ok: true,
            db_name,
            current_user,
        }),
    ))
}

/// `POST /auth/logout`
///
/// Idempotent: clears the session cookies whether or not any were set.
pub async fn logout() -> Result<(HeaderMap, Json<LogoutResponse>), AppError> {
    let opts = CookieOptions::default();
    let mut headers = HeaderMap::new();
    append_cookie(&mut headers, build_clear_cookie(ACCESS_TOKEN_COOKIE, &opts))?;
    append_cookie(&mut headers, build_clear_cookie(REFRESH_TOKEN_COOKIE, &opts))?;

    Ok((headers, Json(LogoutResponse { logout_ok: true })))
}

/// `OPTIONS /auth/*`
pub async fn preflight() -> Json<PreflightResponse> {
    Json(PreflightResponse { ok: true })
}

/// Sign both tokens for a payload and collect the `Set-Cookie` headers
fn issue_session<S>(
    state: &AppState<S>,
    payload: &SessionPayload,
) -> Result<(HeaderMap, CurrentUser), AppError> {
    let access = state.tokens.sign_access(payload)?;
    let refresh = state.tokens.sign_refresh(payload)?;

    let opts = CookieOptions::default();
    let mut headers = HeaderMap::new();
    append_cookie(
        &mut headers,
        build_set_cookie(ACCESS_TOKEN_COOKIE, &access, &opts),
    )?;
    append_cookie(
        &mut headers,
        build_set_cookie(REFRESH_TOKEN_COOKIE, &refresh, &opts),
    )?;

    Ok((headers, current_user_from(payload.clone())))
}

fn append_cookie(headers: &mut HeaderMap, cookie: String) -> Result<(), AppError> {
    let value =
        HeaderValue::from_str(&cookie).map_err(|err| AppError::Internal(err.to_string()))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

fn current_user_from(payload: SessionPayload) -> CurrentUser {
    CurrentUser {
        uid: payload.uid,
        db_name: payload.db_name,
        email: payload.email,
        display_name: payload.display_name,
        anonymous: payload.anonymous,
    }
}

/// A fresh identity for a client that presented no usable token
fn anonymous_payload(db_name: &str) -> SessionPayload {
    SessionPayload {
        db_name: db_name.to_string(),
        uid: Uuid::new_v4().to_string(),
        email: Some("anonymous@anonymous.com".to_string()),
        display_name: Some("anonymous".to_string()),
        anonymous: true,
    }
}
