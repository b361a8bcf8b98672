use axum::http::{HeaderMap, header};
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::cookie::read_cookie;

pub type Translations = HashMap<String, String>;

/// Cookie carrying the user's explicit language choice.
pub const LANG_COOKIE: &str = "lang";

/// A resolved language with its translation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    lang: String,
    translations: Arc<Translations>,
}

impl Locale {
    pub fn new(lang: impl Into<String>, translations: Arc<Translations>) -> Self {
        Self {
            lang: lang.into(),
            translations,
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Missing keys translate to themselves.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations.get(key).map_or(key, String::as_str)
    }
}

/// Request signals a locale store may consult, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleSignals {
    pub preferred: Option<String>,
    pub accept_language: Option<String>,
}

impl LocaleSignals {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let accept_language = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            preferred: read_cookie(headers, LANG_COOKIE),
            accept_language,
        }
    }
}
