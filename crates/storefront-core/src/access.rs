//! Route gating from the current identity.
//!
//! ```text
//! requirement      no identity      user identity     admin identity
//! Authenticated    RedirectLogin    Allowed           Allowed
//! AdminOnly        RedirectLogin    RedirectHome      Allowed
//! ```

use crate::types::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    AdminOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    /// Not signed in: send to the login page.
    RedirectLogin,
    /// Signed in without the admin role: send home.
    RedirectHome,
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }
}

pub fn check_access(identity: Option<&Identity>, requirement: Requirement) -> Access {
    match (identity, requirement) {
        (None, _) => Access::RedirectLogin,
        (Some(identity), Requirement::AdminOnly) if !identity.is_admin() => Access::RedirectHome,
        (Some(_), _) => Access::Allowed,
    }
}
