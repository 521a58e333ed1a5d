//! Cookie helpers.
//!
//! Only two cookies exist: `sid` (session ID) and `oauth_state` (CSRF value
//! for the sign-in round trip), so `Cookie`/`Set-Cookie` are handled directly.

use axum::http::{header, HeaderMap};
use std::time::Duration;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "sid";

/// OAuth CSRF state cookie name.
pub const STATE_COOKIE: &str = "oauth_state";

/// Lifetime of the `oauth_state` cookie.
pub const STATE_COOKIE_MAX_AGE: Duration = Duration::from_secs(10 * 60);

/// Read a cookie value from the request's `Cookie` headers.
#[must_use]
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Build a `Set-Cookie` value: `HttpOnly; SameSite=Lax; Path=/`.
#[must_use]
pub fn set_cookie(name: &str, value: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{name}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build a `Set-Cookie` value that deletes `name`.
#[must_use]
pub fn expire_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "theme=dark; sid=abc-123".parse().unwrap());
        headers.append(header::COOKIE, "oauth_state=xyz".parse().unwrap());

        assert_eq!(read_cookie(&headers, SESSION_COOKIE), Some("abc-123"));
        assert_eq!(read_cookie(&headers, STATE_COOKIE), Some("xyz"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_set_cookie_attributes() {
        let cookie = set_cookie(SESSION_COOKIE, "v", Duration::from_secs(604_800), true);
        assert_eq!(
            cookie,
            "sid=v; HttpOnly; SameSite=Lax; Path=/; Max-Age=604800; Secure"
        );
        assert!(expire_cookie(SESSION_COOKIE).ends_with("Max-Age=0"));
    }
}
