//! Principal domain model
//!
//! A principal is the authenticated account a request acts as. Accounts are
//! at most two levels deep: an owner, and child accounts whose `parent` is
//! that owner.

use chrono::{DateTime, Utc};
use pushboard_rbac::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated account.
///
/// Unauthenticated requests carry no principal at all; they are evaluated as
/// [`Role::Guest`] by the authorization gate.
///
/// # Examples
///
/// ```
/// use pushboard_org::Principal;
/// use pushboard_rbac::Role;
///
/// let owner = Principal::new("owner@example.com", Role::User);
/// let child = Principal::child_of(&owner, "ops@example.com");
///
/// assert!(child.is_child_account());
/// assert_eq!(child.account_owner(), owner.id);
/// assert_eq!(owner.account_owner(), owner.id);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Stable identity
    pub id: Uuid,

    /// Permission tier
    pub role: Role,

    /// Owning account, for child accounts
    pub parent: Option<Uuid>,

    /// Login email
    pub email: String,

    /// Display name
    pub display_name: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Creates a new top-level account.
    ///
    /// # Arguments
    ///
    /// * `email` - Login email
    /// * `role` - Permission tier
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            parent: None,
            email: email.into(),
            display_name: None,
            created_at: Utc::now(),
        }
    }

    /// Creates a child account owned by `parent`.
    ///
    /// Child accounts always get the [`Role::User`] tier.
    pub fn child_of(parent: &Principal, email: impl Into<String>) -> Self {
        Self {
            parent: Some(parent.id),
            ..Self::new(email, Role::User)
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Check whether this account was created under another account.
    pub fn is_child_account(&self) -> bool {
        self.parent.is_some()
    }

    /// The account whose resources this principal works with: the parent for
    /// child accounts, the principal itself otherwise.
    pub fn account_owner(&self) -> Uuid {
        self.parent.unwrap_or(self.id)
    }

    /// Check whether `other` is a direct child account of this principal.
    pub fn is_parent_of(&self, other: &Principal) -> bool {
        other.parent == Some(self.id)
    }
}
