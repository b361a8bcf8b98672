pub mod negotiate;
pub mod store;
pub mod types;

pub use store::{LocaleError, LocaleStore, StaticLocaleStore};
pub use types::{LANG_COOKIE, Locale, LocaleSignals, Translations};
