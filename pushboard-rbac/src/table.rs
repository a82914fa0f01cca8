//! # Role Table
//!
//! The immutable role → route → methods lookup consulted on every request,
//! and the [`PermissionMatcher`] seam the authorization gate calls through.

use std::collections::HashMap;

use crate::error::{RbacError, RbacResult};
use crate::methods::Method;
use crate::permissions::{MethodSet, RolePolicy, RoleRule};
use crate::roles::Role;

/// Route template for an application's segment collection.
pub const SEGMENTS_ROUTE: &str = "/api/applications/:applicationId/segments";

/// Route template for a single segment of an application.
pub const SEGMENT_ROUTE: &str = "/api/applications/:applicationId/segments/:segmentId";

/// Decides whether a role may use a method on a route template.
///
/// `Ok(false)` is a clean denial. `Err` means the decision could not be
/// evaluated and must be reported as a system failure.
pub trait PermissionMatcher: Send + Sync {
    /// Check `method` on `route_template` for `role`.
    fn is_role_allowed(&self, role: Role, route_template: &str, method: &str) -> RbacResult<bool>;
}

/// Validated role policies indexed by role and route template.
///
/// Built once at startup and never mutated, so it can be shared across
/// concurrent requests behind an `Arc` without locking.
///
/// # Example
///
/// ```
/// use pushboard_rbac::{Method, Role, RoleTable, SEGMENTS_ROUTE};
///
/// let table = RoleTable::segments_default();
/// assert!(table.is_method_allowed(Role::User, SEGMENTS_ROUTE, Method::Get));
/// assert!(!table.is_method_allowed(Role::Guest, SEGMENTS_ROUTE, Method::Get));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleTable {
    rules: HashMap<Role, HashMap<String, MethodSet>>,
}

impl RoleTable {
    /// Build a table from role policies.
    ///
    /// Several policies may name the same role; their rules are merged.
    ///
    /// # Errors
    ///
    /// - [`RbacError::InvalidPattern`] if a pattern is empty or not rooted at `/`
    /// - [`RbacError::DuplicateRule`] if a role lists the same pattern twice
    pub fn new<I>(policies: I) -> RbacResult<Self>
    where
        I: IntoIterator<Item = RolePolicy>,
    {
        let mut rules: HashMap<Role, HashMap<String, MethodSet>> = HashMap::new();

        for policy in policies {
            let role_rules = rules.entry(policy.role).or_default();
            for RoleRule {
                resource_pattern,
                methods,
            } in policy.rules
            {
                if resource_pattern.is_empty() || !resource_pattern.starts_with('/') {
                    return Err(RbacError::InvalidPattern(resource_pattern));
                }
                if role_rules.contains_key(&resource_pattern) {
                    return Err(RbacError::DuplicateRule {
                        role: policy.role,
                        pattern: resource_pattern,
                    });
                }
                role_rules.insert(resource_pattern, methods);
            }
        }

        Ok(Self { rules })
    }

    /// Parse and validate a JSON policy document (an array of role policies).
    pub fn from_json(json: &str) -> RbacResult<Self> {
        let policies: Vec<RolePolicy> = serde_json::from_str(json)?;
        Self::new(policies)
    }

    /// The policies served by the segments endpoints.
    ///
    /// Admins and users may use every method on both segment routes. Guests
    /// are listed with an empty method set, so they are denied.
    pub fn segments_default() -> Self {
        Self::new(Self::segments_default_policies()).unwrap_or_default()
    }

    /// The policies behind [`RoleTable::segments_default`].
    pub fn segments_default_policies() -> Vec<RolePolicy> {
        vec![
            RolePolicy::new(Role::Admin)
                .with_rule(RoleRule::allow_all(SEGMENTS_ROUTE))
                .with_rule(RoleRule::allow_all(SEGMENT_ROUTE)),
            RolePolicy::new(Role::User)
                .with_rule(RoleRule::allow_all(SEGMENTS_ROUTE))
                .with_rule(RoleRule::allow_all(SEGMENT_ROUTE)),
            RolePolicy::new(Role::Guest)
                .with_rule(RoleRule::deny_all(SEGMENTS_ROUTE))
                .with_rule(RoleRule::deny_all(SEGMENT_ROUTE)),
        ]
    }

    /// Check whether the table has any rules for `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.rules.contains_key(&role)
    }

    /// Get the method set `role` holds on exactly `route_template`.
    pub fn rule(&self, role: Role, route_template: &str) -> Option<&MethodSet> {
        self.rules.get(&role)?.get(route_template)
    }

    /// Number of (role, pattern) rules in the table.
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    /// Check if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check a parsed method. Unknown roles and unlisted templates deny.
    pub fn is_method_allowed(&self, role: Role, route_template: &str, method: Method) -> bool {
        self.rule(role, route_template)
            .map(|set| set.allows(method))
            .unwrap_or(false)
    }
}

impl PermissionMatcher for RoleTable {
    fn is_role_allowed(&self, role: Role, route_template: &str, method: &str) -> RbacResult<bool> {
        let method = Method::parse(method).ok_or_else(|| RbacError::UnknownMethod(method.to_string()))?;
        Ok(self.is_method_allowed(role, route_template, method))
    }
}
