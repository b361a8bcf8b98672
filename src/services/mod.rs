pub mod auth;
pub mod cache;
pub mod locale;
pub mod session;
