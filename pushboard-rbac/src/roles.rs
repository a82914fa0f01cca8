//! Principal roles
//!
//! Roles are the permission tiers consulted by the role table. The set is
//! closed; an unauthenticated caller is always evaluated as [`Role::Guest`].

use serde::{Deserialize, Serialize};

/// Permission tier of a principal.
///
/// # Permission Model
///
/// - **Guest**: No authenticated identity; only explicitly public routes
/// - **User**: Regular account, including child accounts created by an owner
/// - **Admin**: Operator account
///
/// Roles do not inherit from each other. Each role is granted routes
/// explicitly by the role table.
///
/// # Examples
///
/// ```
/// use pushboard_rbac::Role;
///
/// assert_eq!(Role::parse("admin"), Some(Role::Admin));
/// assert!(Role::Guest.is_anonymous());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unauthenticated caller
    Guest,

    /// Regular authenticated account
    User,

    /// Operator account
    Admin,
}

impl Role {
    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Role)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use pushboard_rbac::Role;
    ///
    /// assert_eq!(Role::parse("USER"), Some(Role::User));
    /// assert_eq!(Role::parse("owner"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "guest" => Some(Self::Guest),
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Check whether this role stands for an unauthenticated caller.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Guest)
    }

    /// Get all roles.
    pub fn all() -> Vec<Self> {
        vec![Self::Guest, Self::User, Self::Admin]
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Guest
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
