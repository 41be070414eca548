// ================
// common/src/lib.rs
// ================
//! Wire types shared between gatehouse clients and the server.
//! This module defines the JSON bodies of the `/auth` endpoints and the
//! uniform error envelope every endpoint returns on failure.

use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "access-token";

/// Name of the cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refresh-token";

/// Public projection of a session identity
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Stored user id, or a freshly minted opaque id for anonymous sessions
    pub uid: String,
    /// Project the session is bound to
    pub db_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// True when the session is not backed by a stored user record.
    /// Omitted on the wire for authenticated sessions.
    #[serde(default, skip_serializing_if = "is_false")]
    pub anonymous: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Body of `POST /auth/login`
/// # Fields
/// * `email` - Account email
/// * `password` - Account password
/// * `db_name` - Project to log into
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub db_name: String,
}

/// Body of `POST /auth/register`
/// # Fields
/// * `email` - Email for the new account
/// * `password` - Password for the new account
/// * `db_name` - Project the account belongs to
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub db_name: String,
}

/// Body of `POST /auth/refresh`. The project may also be supplied as a
/// `dbName` query parameter instead of a body.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
}

/// Success body of `POST /auth/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub login_ok: bool,
    pub db_name: String,
    pub current_user: CurrentUser,
}

/// Success body of `POST /auth/register`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub register_ok: bool,
    pub db_name: String,
    pub current_user: CurrentUser,
}

/// Success body of `POST /auth/refresh`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub refresh_ok: bool,
    pub db_name: String,
    pub current_user: CurrentUser,
}

/// Success body of `POST /auth/logout`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub logout_ok: bool,
}

/// Body returned for `OPTIONS` requests under `/auth`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PreflightResponse {
    pub ok: bool,
}

/// Uniform error envelope returned by every endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

/// Contents of the error envelope
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// HTTP status of the response, repeated in the body
    pub status_code: u16,
    /// Human-readable message, sanitized for 5xx failures
    pub message: String,
    /// Short error family name, e.g. "Forbidden" or "Bad Request"
    pub error_type: String,
    /// Structured details; for validation failures a map of field name to
    /// a list of messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
