//! # Permissions
//!
//! Method sets and the per-role rules built from them.
//! A rule pairs a route template with the methods a role may use on it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::RbacError;
use crate::methods::Method;
use crate::roles::Role;

/// The methods a rule grants on its route template.
///
/// In a policy document the wildcard is written as the string `"*"` and an
/// explicit set as a list of method names. The empty list denies everything.
///
/// # Example
///
/// ```
/// use pushboard_rbac::{Method, MethodSet};
///
/// assert!(MethodSet::All.allows(Method::Delete));
/// assert!(!MethodSet::none().allows(Method::Get));
///
/// let read_only = MethodSet::only([Method::Get, Method::Head]);
/// assert!(read_only.allows(Method::Get));
/// assert!(!read_only.allows(Method::Post));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMethodSet", into = "RawMethodSet")]
pub enum MethodSet {
    /// Every method is allowed.
    All,
    /// Exactly these methods are allowed.
    Only(BTreeSet<Method>),
}

impl MethodSet {
    /// The explicit empty set.
    pub fn none() -> Self {
        MethodSet::Only(BTreeSet::new())
    }

    /// An explicit set of methods.
    pub fn only<I>(methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        MethodSet::Only(methods.into_iter().collect())
    }

    /// Check whether `method` is granted by this set.
    pub fn allows(&self, method: Method) -> bool {
        match self {
            MethodSet::All => true,
            MethodSet::Only(methods) => methods.contains(&method),
        }
    }

    /// Check whether this set denies every method.
    pub fn is_deny_all(&self) -> bool {
        matches!(self, MethodSet::Only(methods) if methods.is_empty())
    }
}

/// Wire shape of a [`MethodSet`]: `"*"` or a list of method names.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawMethodSet {
    Wildcard(String),
    List(Vec<Method>),
}

impl TryFrom<RawMethodSet> for MethodSet {
    type Error = RbacError;

    fn try_from(raw: RawMethodSet) -> Result<Self, Self::Error> {
        match raw {
            RawMethodSet::Wildcard(s) if s == "*" => Ok(MethodSet::All),
            RawMethodSet::Wildcard(s) => Err(RbacError::InvalidPermissions(s)),
            RawMethodSet::List(methods) => Ok(MethodSet::only(methods)),
        }
    }
}

impl From<MethodSet> for RawMethodSet {
    fn from(set: MethodSet) -> Self {
        match set {
            MethodSet::All => RawMethodSet::Wildcard("*".to_string()),
            MethodSet::Only(methods) => RawMethodSet::List(methods.into_iter().collect()),
        }
    }
}

/// A single route rule within a role policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    /// Route template, e.g. `/api/applications/:applicationId/segments`.
    ///
    /// Path parameters are part of the template text and are never matched
    /// against concrete values.
    pub resource_pattern: String,
    /// Methods granted on the template.
    pub methods: MethodSet,
}

impl RoleRule {
    /// Create a rule.
    pub fn new(resource_pattern: impl Into<String>, methods: MethodSet) -> Self {
        Self {
            resource_pattern: resource_pattern.into(),
            methods,
        }
    }

    /// Rule granting every method on `resource_pattern`.
    pub fn allow_all(resource_pattern: impl Into<String>) -> Self {
        Self::new(resource_pattern, MethodSet::All)
    }

    /// Rule listing `resource_pattern` with no methods granted.
    pub fn deny_all(resource_pattern: impl Into<String>) -> Self {
        Self::new(resource_pattern, MethodSet::none())
    }
}

/// All rules for one role.
///
/// # Example
///
/// ```
/// use pushboard_rbac::{Role, RolePolicy, RoleRule};
///
/// let policy = RolePolicy::new(Role::User)
///     .with_rule(RoleRule::allow_all("/api/applications/:applicationId/segments"));
/// assert_eq!(policy.rules.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePolicy {
    /// Role the rules apply to.
    pub role: Role,
    /// Route rules for the role.
    #[serde(default)]
    pub rules: Vec<RoleRule>,
}

impl RolePolicy {
    /// Create an empty policy for `role`.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            rules: Vec::new(),
        }
    }

    /// Add a rule.
    pub fn with_rule(mut self, rule: RoleRule) -> Self {
        self.rules.push(rule);
        self
    }
}
