// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Session token signing and verification.
use base64::{engine::general_purpose, Engine as _};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::TokenSettings;
use crate::error::AppError;

/// Minimum accepted secret size after decoding
const MIN_SECRET_BYTES: usize = 32;

/// Claim set carried inside a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub db_name: String,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
}

impl SessionPayload {
    /// Reduced claim set carried by refresh tokens: enough to re-establish
    /// the identity, nothing more
    pub fn reduced(&self) -> SessionPayload {
        SessionPayload {
            db_name: self.db_name.clone(),
            uid: self.uid.clone(),
            email: None,
            display_name: None,
            anonymous: self.anonymous,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    payload: SessionPayload,
    iat: u64,
    exp: u64,
}

/// Signs and verifies session payloads with a fixed key/algorithm pair.
///
/// Built once at startup from the token settings; the key material is
/// immutable for the process lifetime.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenService {
    /// Build the service. Only HMAC algorithms are accepted: the configured
    /// secret is symmetric key material and the algorithm must match it.
    pub fn from_settings(settings: &TokenSettings) -> Result<Self, AppError> {
        let algorithm = match settings.algorithm.as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(AppError::Signing(format!(
                    "{other} does not take a symmetric secret; use HS256, HS384 or HS512"
                )))
            }
        };

        let secret = decode_secret(&settings.secret);
        if secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::Signing(format!(
                "signing secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            algorithm,
            access_ttl_secs: settings.access_ttl_secs,
            refresh_ttl_secs: settings.refresh_ttl_secs,
        })
    }

    /// Sign an access token carrying the full payload
    pub fn sign_access(&self, payload: &SessionPayload) -> Result<String, AppError> {
        self.sign(payload.clone(), self.access_ttl_secs)
    }

    /// Sign a refresh token carrying the reduced payload
    pub fn sign_refresh(&self, payload: &SessionPayload) -> Result<String, AppError> {
        self.sign(payload.reduced(), self.refresh_ttl_secs)
    }

    fn sign(&self, payload: SessionPayload, ttl_secs: u64) -> Result<String, AppError> {
        let iat = unix_now();
        let claims = Claims {
            payload,
            iat,
            exp: iat + ttl_secs,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|err| AppError::Signing(err.to_string()))
    }

    /// Recover the payload from a token. Fails closed: any signature,
    /// encoding or algorithm mismatch is `TokenInvalid`; a token past its
    /// expiry is `TokenExpired`.
    pub fn verify(&self, token: &str) -> Result<SessionPayload, AppError> {
        let validation = Validation::new(self.algorithm);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::TokenInvalid(err.to_string()),
            }
        })?;

        Ok(data.claims.payload)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Accept raw or base64-encoded secret material
fn decode_secret(raw: &str) -> Vec<u8> {
    let trimmed = raw.trim();

    if let Ok(bytes) = general_purpose::STANDARD.decode(trimmed) {
        if bytes.len() >= MIN_SECRET_BYTES {
            return bytes;
        }
    }

    trimmed.as_bytes().to_vec()
}
