//! Session Cookies
//!
//! `token` (HttpOnly), `userID` and `username`, all expiring with the token.

use axum::http::{HeaderMap, header};
use platform::cookie::CookieConfig;

use crate::application::session_guard::{TOKEN_COOKIE, USER_ID_COOKIE, USERNAME_COOKIE};
use crate::domain::token::IssuedToken;

/// Append the session cookies for `token` to `headers`
///
/// `username` is skipped when unknown.
pub fn append_session_cookies(
    headers: &mut HeaderMap,
    config: &CookieConfig,
    token: &IssuedToken,
    username: Option<&str>,
) {
    let cookies = [
        (TOKEN_COOKIE, Some(token.token.as_str()), true),
        (USER_ID_COOKIE, Some(token.user_id.as_str()), false),
        (USERNAME_COOKIE, username, false),
    ];

    for (name, value, http_only) in cookies {
        let Some(value) = value else {
            continue;
        };

        match config.set_cookie_header(name, value, token.expires_at, http_only) {
            Some(header_value) => {
                headers.append(header::SET_COOKIE, header_value);
            }
            None => tracing::warn!(cookie = name, "Skipping cookie with invalid header value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use kernel::id::UserId;

    fn token() -> IssuedToken {
        IssuedToken {
            token: "payload.sig".to_string(),
            user_id: UserId::new("u1"),
            expires_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 5, 9).unwrap(),
        }
    }

    fn set_cookies(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_three_cookies_share_expiry() {
        let mut headers = HeaderMap::new();
        append_session_cookies(&mut headers, &CookieConfig::default(), &token(), Some("Ada L"));

        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 3);
        assert!(cookies[0].starts_with("token=payload.sig;"));
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[1].starts_with("userID=u1;"));
        assert!(!cookies[1].contains("HttpOnly"));
        assert!(cookies[2].starts_with("username=Ada%20L;"));
        for cookie in &cookies {
            assert!(cookie.contains("Expires=Sun, 01 Mar 2026 08:05:09 GMT"));
            assert!(cookie.contains("Path=/"));
        }
    }

    #[test]
    fn test_unknown_username_skipped() {
        let mut headers = HeaderMap::new();
        append_session_cookies(&mut headers, &CookieConfig::default(), &token(), None);
        assert_eq!(set_cookies(&headers).len(), 2);
    }
}
