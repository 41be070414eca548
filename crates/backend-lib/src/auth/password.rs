// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Credential hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};
use zeroize::Zeroize;

/// Hash a plaintext credential with scrypt and a fresh salt
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt.hash_password(plain.as_bytes(), &salt)?.to_string();
    Ok(hash)
}

/// Verify a plaintext credential against a stored scrypt hash
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Hash a credential and zeroize the plaintext buffer afterwards
pub fn hash_password_secure(plain: &mut String) -> anyhow::Result<String> {
    let hash = hash_password(plain)?;
    plain.zeroize();
    Ok(hash)
}
