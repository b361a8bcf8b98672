pub mod cache_store;
pub mod store;
pub mod types;

pub use cache_store::CacheSessionStore;
pub use store::{SessionStore, SessionStoreError};
pub use types::{Session, generate_token};
