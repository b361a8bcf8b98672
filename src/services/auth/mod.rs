pub mod authorize;
pub mod credentials;
pub mod roles;

pub use authorize::AuthorizationError;
pub use credentials::{BasicCredentials, BearerToken, extract_basic_auth, extract_bearer_token};
pub use roles::Role;
