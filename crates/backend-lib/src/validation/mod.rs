// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request body validation.
//!
//! Bodies arrive as raw JSON and are checked against the declared shape
//! before any handler logic runs. Failures collect per-field message lists
//! that surface in the `data` member of the error envelope.

use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::AppError;

// Common validation constants
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_DB_NAME_LENGTH: usize = 63;

// Regex patterns for validation
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static DB_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]*$").unwrap());

/// Per-field validation messages
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Validated credential request body; login and register share the shape
#[derive(Debug)]
pub struct CredentialRequest {
    pub email: String,
    pub password: String,
    pub db_name: String,
}

/// Parse a request body into JSON. An empty body counts as an empty
/// document so missing fields are reported per-field.
pub fn parse_json_body(bytes: &[u8]) -> Result<Value, AppError> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_slice(bytes).map_err(|err| {
        let mut errors = FieldErrors::new();
        push(&mut errors, "body", format!("invalid JSON: {err}"));
        AppError::Validation { data: errors }
    })
}

/// Validate the `{email, password, dbName}` body shared by login and register
pub fn validate_credentials(body: &Value) -> Result<CredentialRequest, AppError> {
    let mut errors = FieldErrors::new();

    let email = string_field(body, "email", &mut errors);
    let password = string_field(body, "password", &mut errors);
    let db_name = string_field(body, "dbName", &mut errors);

    if let Some(email) = &email {
        check_email(email, &mut errors);
    }
    if let Some(password) = &password {
        check_password(password, &mut errors);
    }
    if let Some(db_name) = &db_name {
        check_db_name(db_name, &mut errors);
    }

    match (email, password, db_name) {
        (Some(email), Some(password), Some(db_name)) if errors.is_empty() => Ok(CredentialRequest {
            email,
            password,
            db_name,
        }),
        _ => Err(AppError::Validation { data: errors }),
    }
}

/// Validate the refresh request: `dbName` comes from the body or the query
pub fn validate_refresh(body: &Value, query: &HashMap<String, String>) -> Result<String, AppError> {
    let db_name = body
        .get("dbName")
        .and_then(Value::as_str)
        .or_else(|| query.get("dbName").map(String::as_str));

    let mut errors = FieldErrors::new();
    match db_name {
        Some(name) => {
            check_db_name(name, &mut errors);
            if errors.is_empty() {
                Ok(name.to_string())
            } else {
                Err(AppError::Validation { data: errors })
            }
        }
        None => {
            push(&mut errors, "dbName", "is required".to_string());
            Err(AppError::Validation { data: errors })
        }
    }
}

fn string_field(body: &Value, name: &str, errors: &mut FieldErrors) -> Option<String> {
    match body.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::String(_)) => {
            push(errors, name, "must not be empty".to_string());
            None
        }
        Some(_) => {
            push(errors, name, "must be a string".to_string());
            None
        }
        None => {
            push(errors, name, "is required".to_string());
            None
        }
    }
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.len() > MAX_EMAIL_LENGTH {
        push(
            errors,
            "email",
            format!("cannot exceed {MAX_EMAIL_LENGTH} characters"),
        );
    } else if !EMAIL_REGEX.is_match(email) {
        push(errors, "email", "must be a valid email address".to_string());
    }
}

fn check_password(password: &str, errors: &mut FieldErrors) {
    if password.len() > MAX_PASSWORD_LENGTH {
        push(
            errors,
            "password",
            format!("cannot exceed {MAX_PASSWORD_LENGTH} characters"),
        );
    }
}

fn check_db_name(db_name: &str, errors: &mut FieldErrors) {
    if db_name.len() > MAX_DB_NAME_LENGTH {
        push(
            errors,
            "dbName",
            format!("cannot exceed {MAX_DB_NAME_LENGTH} characters"),
        );
    } else if !DB_NAME_REGEX.is_match(db_name) {
        push(
            errors,
            "dbName",
            "must contain only alphanumeric characters, hyphens and underscores".to_string(),
        );
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}
