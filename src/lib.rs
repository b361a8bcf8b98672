//! Per-request authentication, session and locale resolution for an axum
//! application.
//!
//! Handlers take a [`context::RequestContext`] and ask it for what they need:
//! credentials from the `Authorization` header, the session behind the session
//! cookie, the request locale, or a role check. Each answer is computed once per
//! request.

pub mod api;
pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;

#[cfg(test)]
mod testing;
