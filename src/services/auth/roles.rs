use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role hierarchy, lowest to highest. A granted role implies every role
/// declared before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    Signer,
    User,
    Creator,
    Admin,
    SuperAdmin,
    Root,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Signer => "signer",
            Role::User => "user",
            Role::Creator => "creator",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
            Role::Root => "root",
        }
    }

    pub fn implies(self, required: Role) -> bool {
        self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "signer" => Ok(Role::Signer),
            "user" => Ok(Role::User),
            "creator" => Ok(Role::Creator),
            "admin" => Ok(Role::Admin),
            "super_admin" | "superadmin" => Ok(Role::SuperAdmin),
            "root" => Ok(Role::Root),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// True when any granted role implies `required`.
pub fn is_granted(granted: &[Role], required: Role) -> bool {
    granted.iter().any(|role| role.implies(required))
}
