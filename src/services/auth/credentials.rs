//! Credential extraction from the `Authorization` header.
//!
//! Both extractors fail closed: a header that does not match the expected shape
//! exactly yields `None`, the same value as a missing header. Callers treat
//! `None` as "unauthenticated" and never learn why parsing failed.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

const BEARER_SCHEME: &str = "Bearer";
const BASIC_SCHEME: &str = "Basic";

/// Opaque bearer token taken verbatim from `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Tokens are credentials; keep them out of debug logs.
impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

/// Username/password pair decoded from `Authorization: Basic <base64>`.
///
/// Either field may be empty (`"alice:"` is a present credential with an empty
/// password); absence is expressed by the surrounding `Option`.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"..")
            .finish()
    }
}

/// Whitespace set of the header grammar: space, tab, LF, FF, CR.
fn is_header_whitespace(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Splits `<scheme> <param>` where `param` is a single non-empty run of
/// non-whitespace characters. The scheme keyword is case-sensitive and exactly
/// one space separates it from the parameter.
fn scheme_param<'a>(header: &'a str, scheme: &str) -> Option<&'a str> {
    let param = header.strip_prefix(scheme)?.strip_prefix(' ')?;

    if param.is_empty() || param.contains(is_header_whitespace) {
        return None;
    }

    Some(param)
}

/// `Authorization: Bearer <token>` → token.
pub fn extract_bearer_token(header: &str) -> Option<BearerToken> {
    scheme_param(header, BEARER_SCHEME).map(|token| BearerToken(token.to_string()))
}

/// `Authorization: Basic <base64(username:password)>` → credentials.
///
/// The decoded payload must be UTF-8 and contain exactly one `:`; both fields
/// are trimmed.
pub fn extract_basic_auth(header: &str) -> Option<BasicCredentials> {
    let payload = scheme_param(header, BASIC_SCHEME)?;

    let decoded = STANDARD.decode(payload).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let mut fields = decoded.split(':');
    let (username, password) = match (fields.next(), fields.next(), fields.next()) {
        (Some(username), Some(password), None) => (username, password),
        _ => return None,
    };

    Some(BasicCredentials {
        username: username.trim().to_string(),
        password: password.trim().to_string(),
    })
}
