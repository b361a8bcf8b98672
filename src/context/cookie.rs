//! Session cookie plumbing.
//!
//! Reading: the session key comes from the `Cookie` request header.
//! Writing: the request context records a pending update and handlers return
//! it as a response part, which appends a `Set-Cookie` header.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponseParts, ResponseParts};
use std::convert::Infallible;

/// Value of the first cookie named `name` across all `Cookie` headers.
/// Empty values count as absent.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookieConfig {
    pub name: String,
    pub max_age_seconds: u64,
    pub secure: bool,
}

impl SessionCookieConfig {
    fn render(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Cookie change produced by creating, replacing or ending a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieUpdate {
    Set { token: String },
    Clear,
}

impl CookieUpdate {
    pub fn to_header_value(&self, config: &SessionCookieConfig) -> Option<HeaderValue> {
        let rendered = match self {
            CookieUpdate::Set { token } => config.render(token, config.max_age_seconds),
            CookieUpdate::Clear => config.render("", 0),
        };

        match HeaderValue::from_str(&rendered) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!(error = %err, cookie = %config.name, "session cookie is not a valid header value");
                None
            }
        }
    }
}

/// Response part carrying the pending `Set-Cookie`, if any.
#[derive(Debug, Clone)]
pub struct SetSessionCookie(pub Option<HeaderValue>);

impl IntoResponseParts for SetSessionCookie {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(value) = self.0 {
            res.headers_mut().append(header::SET_COOKIE, value);
        }
        Ok(res)
    }
}

/// RFC 6265 cookie-name (token) check, used for configuration validation.
pub fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}
