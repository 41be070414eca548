// crates/backend-lib/src/auth/cookie.rs

//! Session cookie construction and parsing.
//!
//! The only cookies this server touches are its own session tokens, so the
//! `Set-Cookie` values are built directly rather than through a cookie jar.

/// `SameSite` attribute of a session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Attributes applied to a session cookie
#[derive(Debug, Clone)]
pub struct CookieOptions {
    pub path: &'static str,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age_secs: Option<u64>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/",
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
            max_age_secs: None,
        }
    }
}

/// Build a `Set-Cookie` header value
pub fn build_set_cookie(name: &str, value: &str, opts: &CookieOptions) -> String {
    let mut out = format!("{name}={value}; Path={}", opts.path);

    if let Some(max_age) = opts.max_age_secs {
        out.push_str(&format!("; Max-Age={max_age}"));
    }
    if opts.http_only {
        out.push_str("; HttpOnly");
    }
    if opts.secure {
        out.push_str("; Secure");
    }
    match opts.same_site {
        SameSite::Strict => out.push_str("; SameSite=Strict"),
        SameSite::Lax => out.push_str("; SameSite=Lax"),
        SameSite::None => out.push_str("; SameSite=None"),
    }

    out
}

/// Build a `Set-Cookie` value that removes the cookie
pub fn build_clear_cookie(name: &str, opts: &CookieOptions) -> String {
    let mut out = format!("{name}=; Path={}; Max-Age=0", opts.path);
    if opts.http_only {
        out.push_str("; HttpOnly");
    }
    out
}

/// Extract a cookie value from a `Cookie` request header. Cookies cleared
/// to an empty value count as absent.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
