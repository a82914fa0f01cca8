//! # Methods
//!
//! HTTP-style request methods that role rules grant or withhold.
//! Methods are the verbs a role may use against a route template.

use serde::{Deserialize, Serialize};

/// Request methods understood by the role table.
///
/// Methods map one-to-one onto HTTP verbs:
/// - **Get**: Read a resource or collection
/// - **Post**: Create a new resource
/// - **Put**: Replace/update an existing resource
/// - **Patch**: Partially update an existing resource
/// - **Delete**: Remove a resource
/// - **Head**: Metadata-only read
/// - **Options**: Capability discovery
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Read a resource or collection.
    Get,

    /// Create a new resource.
    Post,

    /// Update an existing resource.
    Put,

    /// Partially update an existing resource.
    Patch,

    /// Remove a resource.
    Delete,

    /// Metadata-only read.
    Head,

    /// Capability discovery.
    Options,
}

impl Method {
    /// Get the string representation of the method.
    ///
    /// # Returns
    ///
    /// A static lowercase string, matching how methods appear in role policy files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Options => "options",
        }
    }

    /// Parse a method from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, surrounding whitespace ignored)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use pushboard_rbac::methods::Method;
    ///
    /// assert_eq!(Method::parse("GET"), Some(Method::Get));
    /// assert_eq!(Method::parse("delete"), Some(Method::Delete));
    /// assert_eq!(Method::parse("fetch"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "get" => Some(Method::Get),
            "post" => Some(Method::Post),
            "put" => Some(Method::Put),
            "patch" => Some(Method::Patch),
            "delete" => Some(Method::Delete),
            "head" => Some(Method::Head),
            "options" => Some(Method::Options),
            _ => None,
        }
    }

    /// Get all methods.
    ///
    /// # Returns
    ///
    /// A vector containing every method, in declaration order.
    pub fn all() -> Vec<Self> {
        vec![
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Patch,
            Method::Delete,
            Method::Head,
            Method::Options,
        ]
    }

    /// Check if this method is read-only.
    ///
    /// # Returns
    ///
    /// `true` for Get, Head and Options
    pub fn is_read_only(&self) -> bool {
        matches!(self, Method::Get | Method::Head | Method::Options)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
