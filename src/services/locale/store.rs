use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::services::locale::negotiate::{parse_accept_language, primary_subtag};
use crate::services::locale::{Locale, LocaleSignals, Translations};

/// Locale/translation backend.
///
/// Resolution is infallible: with no usable signal the store answers with its
/// default locale.
#[async_trait]
pub trait LocaleStore: Send + Sync + 'static {
    async fn resolve(&self, signals: &LocaleSignals) -> Locale;
}

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("failed to read translations for {lang}: {source}")]
    Io {
        lang: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid translations for {lang}: {source}")]
    Parse {
        lang: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Fixed set of languages with in-memory translation tables.
#[derive(Debug, Clone)]
pub struct StaticLocaleStore {
    default_lang: String,
    tables: HashMap<String, Arc<Translations>>,
}

impl StaticLocaleStore {
    /// A store that only knows `default_lang`, with an empty table.
    pub fn new(default_lang: impl Into<String>) -> Self {
        let default_lang = default_lang.into().to_ascii_lowercase();
        let mut tables = HashMap::new();
        tables.insert(default_lang.clone(), Arc::new(Translations::new()));

        Self {
            default_lang,
            tables,
        }
    }

    pub fn with_language(mut self, lang: impl Into<String>, translations: Translations) -> Self {
        self.tables
            .insert(lang.into().to_ascii_lowercase(), Arc::new(translations));
        self
    }

    /// Registers every language in `langs`, loading `<dir>/<lang>.json`
    /// (a flat JSON object of key → text) when `dir` is given.
    pub fn load(
        default_lang: &str,
        langs: &[String],
        dir: Option<&Path>,
    ) -> Result<Self, LocaleError> {
        let mut store = Self::new(default_lang);

        for lang in langs.iter().map(|l| l.as_str()).chain([default_lang]) {
            let translations = match dir {
                Some(dir) => read_table(dir, lang)?,
                None => Translations::new(),
            };
            store = store.with_language(lang, translations);
        }

        Ok(store)
    }

    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.tables.contains_key(&lang.to_ascii_lowercase())
    }

    fn locale_for(&self, lang: &str) -> Option<Locale> {
        self.tables
            .get_key_value(lang)
            .map(|(lang, table)| Locale::new(lang.clone(), table.clone()))
    }

    /// Exact tag first, then its primary subtag.
    fn match_tag(&self, tag: &str) -> Option<Locale> {
        let tag = tag.trim().to_ascii_lowercase();
        self.locale_for(&tag)
            .or_else(|| self.locale_for(primary_subtag(&tag)))
    }

    fn default_locale(&self) -> Locale {
        self.locale_for(&self.default_lang).unwrap_or_else(|| {
            Locale::new(self.default_lang.clone(), Arc::new(Translations::new()))
        })
    }
}

fn read_table(dir: &Path, lang: &str) -> Result<Translations, LocaleError> {
    let path = dir.join(format!("{lang}.json"));

    let raw = std::fs::read_to_string(&path).map_err(|source| LocaleError::Io {
        lang: lang.to_string(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| LocaleError::Parse {
        lang: lang.to_string(),
        source,
    })
}

#[async_trait]
impl LocaleStore for StaticLocaleStore {
    async fn resolve(&self, signals: &LocaleSignals) -> Locale {
        let preferred = signals.preferred.iter().cloned();
        let accepted = signals
            .accept_language
            .as_deref()
            .map(parse_accept_language)
            .unwrap_or_default();

        preferred
            .chain(accepted)
            .find_map(|tag| self.match_tag(&tag))
            .unwrap_or_else(|| self.default_locale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> StaticLocaleStore {
        StaticLocaleStore::new("en")
            .with_language("en", [("greeting".to_string(), "Hello".to_string())].into())
            .with_language("de", [("greeting".to_string(), "Hallo".to_string())].into())
            .with_language("pt-BR", Translations::new())
    }

    fn signals(preferred: Option<&str>, accept: Option<&str>) -> LocaleSignals {
        LocaleSignals {
            preferred: preferred.map(str::to_string),
            accept_language: accept.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn no_signal_uses_default() {
        let locale = store().resolve(&LocaleSignals::default()).await;
        assert_eq!(locale.lang(), "en");
        assert_eq!(locale.translate("greeting"), "Hello");
    }

    #[tokio::test]
    async fn preferred_language_beats_accept_language() {
        let locale = store().resolve(&signals(Some("de"), Some("en"))).await;
        assert_eq!(locale.lang(), "de");
    }

    #[tokio::test]
    async fn unsupported_preference_falls_through_to_header() {
        let locale = store().resolve(&signals(Some("xx"), Some("fr, de;q=0.4"))).await;
        assert_eq!(locale.lang(), "de");
    }

    #[tokio::test]
    async fn region_tags_match_exactly_or_by_primary_subtag() {
        let store = store();
        assert_eq!(store.resolve(&signals(None, Some("pt-BR"))).await.lang(), "pt-br");
        assert_eq!(store.resolve(&signals(None, Some("de-AT"))).await.lang(), "de");
    }

    #[tokio::test]
    async fn unmatched_signals_use_default() {
        let locale = store().resolve(&signals(Some("xx"), Some("fr, it"))).await;
        assert_eq!(locale.lang(), "en");
    }

    #[test]
    fn load_without_dir_registers_languages() {
        let store =
            StaticLocaleStore::load("en", &["de".to_string(), "FR".to_string()], None).unwrap();

        assert_eq!(store.default_lang(), "en");
        assert!(store.supports("de"));
        assert!(store.supports("fr"));
        assert!(!store.supports("it"));
    }

    #[test]
    fn load_reports_missing_tables() {
        let dir = std::env::temp_dir().join(format!("locales-{}", uuid::Uuid::new_v4()));
        let err = StaticLocaleStore::load("en", &[], Some(&dir)).unwrap_err();
        assert!(matches!(err, LocaleError::Io { ref lang, .. } if lang == "en"));
    }

    #[test]
    fn load_reads_json_tables() {
        let dir = std::env::temp_dir().join(format!("locales-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("en.json"), r#"{"greeting":"Hello"}"#).unwrap();
        std::fs::write(dir.join("de.json"), r#"{"greeting":"Hallo"}"#).unwrap();

        let store = StaticLocaleStore::load("en", &["de".to_string()], Some(&dir)).unwrap();
        let de = store.locale_for("de").unwrap();
        assert_eq!(de.translate("greeting"), "Hallo");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
