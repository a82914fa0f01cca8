//! Team domain models
//!
//! A team groups child accounts under the account that owns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{required, OrgResult};
use crate::principal::Principal;

/// A named group of child accounts.
///
/// # Examples
///
/// ```
/// use pushboard_org::{Principal, Team};
/// use pushboard_rbac::Role;
///
/// let owner = Principal::new("owner@example.com", Role::User);
/// let team = Team::new("Ops", &owner, Vec::new()).unwrap();
/// assert!(team.is_owned_by(&owner));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    pub id: Uuid,

    /// Team name
    pub name: String,

    /// Owning account
    pub owner: Uuid,

    /// Member account IDs
    #[serde(default)]
    pub members: Vec<Uuid>,

    /// When the team was created
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Creates a team owned by `owner`.
    pub fn new(name: &str, owner: &Principal, members: Vec<Uuid>) -> OrgResult<Self> {
        Ok(Self {
            id: Uuid::now_v7(),
            name: required("name", name, "Team name can not be blank")?,
            owner: owner.id,
            members,
            created_at: Utc::now(),
        })
    }

    /// Check whether `principal` owns this team.
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        self.owner == principal.id
    }

    /// Check whether `principal_id` is a member.
    pub fn has_member(&self, principal_id: Uuid) -> bool {
        self.members.contains(&principal_id)
    }

    /// Rename the team.
    pub fn rename(&mut self, name: &str) -> OrgResult<()> {
        self.name = required("name", name, "Team name can not be blank")?;
        Ok(())
    }

    /// Replace the member list.
    pub fn set_members(&mut self, members: Vec<Uuid>) {
        self.members = members;
    }
}
