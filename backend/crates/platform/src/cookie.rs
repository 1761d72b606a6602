//! Cookie Management Infrastructure
//!
//! Building `Set-Cookie` values with an absolute `Expires` instant and
//! reading values back out of `Cookie` headers.

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, Utc};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes shared by every cookie the service emits
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: false,
            same_site: SameSite::Lax,
            path: "/".to_string(),
        }
    }
}

impl CookieConfig {
    /// Build a Set-Cookie header value
    ///
    /// `value` is percent-encoded, so display names with spaces or
    /// separators survive the round trip.
    pub fn build_set_cookie(
        &self,
        name: &str,
        value: &str,
        expires: DateTime<Utc>,
        http_only: bool,
    ) -> String {
        let mut cookie = format!("{}={}", name, urlencoding::encode(value));

        cookie.push_str(&format!("; Path={}", self.path));
        cookie.push_str(&format!("; Expires={}", http_date(expires)));
        if http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));

        cookie
    }

    /// Build a Set-Cookie header value, as a `HeaderValue`
    pub fn set_cookie_header(
        &self,
        name: &str,
        value: &str,
        expires: DateTime<Utc>,
        http_only: bool,
    ) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_set_cookie(name, value, expires, http_only)).ok()
    }
}

/// Extract a cookie value from headers (percent-decoded)
///
/// Every `Cookie` header is searched; the first match wins.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                urlencoding::decode(value).ok().map(|v| v.into_owned())
            } else {
                None
            }
        })
}

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
fn http_date(instant: DateTime<Utc>) -> String {
    instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
