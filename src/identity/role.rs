use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of roles. Anything the backend or storage hands us outside the
/// three signed-in roles collapses to `None`, which is denied everywhere except
/// public routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
    #[default]
    #[serde(other)]
    None,
}

impl Role {
    pub const SIGNED_IN: [Role; 3] = [Role::Admin, Role::Doctor, Role::Patient];

    /// Exact match only; `"Admin"`, `" admin"` and `""` are all `None`.
    pub fn parse(s: &str) -> Role {
        match s {
            "admin" => Role::Admin,
            "doctor" => Role::Doctor,
            "patient" => Role::Patient,
            _ => Role::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
            Role::None => "none",
        }
    }

    pub fn is_signed_in(&self) -> bool { !matches!(self, Role::None) }

    /// Caption shown under the user badge in the sidebar.
    pub fn description(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Doctor => "Medical Professional",
            Role::Patient => "Patient",
            Role::None => "Visitor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
