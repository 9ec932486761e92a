//! Edge (relation) in the semantic graph.

use std::fmt;

use serde::{Deserialize, Serialize};
use super::NodeId;
use crate::{Error, Result};

/// Arena index of an edge inside its [`Graph`](super::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roles whose base name already ends in `-of`. Their inverse carries a
/// second suffix (`consist-of-of`).
const NATIVE_OF_ROLES: &[&str] = &["consist-of", "prep-out-of", "prep-on-behalf-of"];

const INVERSE_SUFFIX: &str = "-of";

/// A relation label: base name plus inverse marker.
///
/// `:location-of` is stored as `Role { name: "location", inverse: true }`
/// and prints back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub inverse: bool,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), inverse: false }
    }

    pub fn inverted(name: impl Into<String>) -> Self {
        Self { name: name.into(), inverse: true }
    }

    /// Parse a surface label (without the leading `:`).
    pub fn parse(label: &str) -> Result<Self> {
        if !is_valid_label(label) {
            return Err(Error::MalformedRecord(format!("malformed relation label '{label}'")));
        }
        if NATIVE_OF_ROLES.contains(&label) {
            return Ok(Role::new(label));
        }
        match label.strip_suffix(INVERSE_SUFFIX) {
            Some(base) if is_valid_label(base) => Ok(Role::inverted(base)),
            _ => Ok(Role::new(label)),
        }
    }

    /// The label as it appears in Penman, without the leading `:`.
    pub fn printed(&self) -> String {
        if self.inverse {
            format!("{}{INVERSE_SUFFIX}", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.printed())
    }
}

/// Relation labels start with a letter or digit and continue with
/// letters, digits, `-`, `_` or `.`.
pub(crate) fn is_valid_label(label: &str) -> bool {
    let mut chars = label.chars();
    match chars.next() {
        Some(c) if c.is_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !label.ends_with('-')
}

/// A directed, labeled relation from `parent` to `child`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub parent: NodeId,
    pub child: NodeId,
    pub role: Role,
    /// Set when the child was already introduced elsewhere and this edge
    /// only refers to it.
    pub referent: bool,
}

impl Edge {
    pub fn new(id: EdgeId, parent: NodeId, child: NodeId, role: Role) -> Self {
        Self { id, parent, child, role, referent: false }
    }

    pub fn with_referent(mut self, referent: bool) -> Self {
        self.referent = referent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_round_trip() {
        let role = Role::parse("location-of").unwrap();
        assert_eq!(role, Role::inverted("location"));
        assert_eq!(role.printed(), "location-of");
        assert_eq!(role.to_string(), ":location-of");
    }

    #[test]
    fn test_native_of_roles() {
        assert_eq!(Role::parse("consist-of").unwrap(), Role::new("consist-of"));
        let inv = Role::parse("consist-of-of").unwrap();
        assert_eq!(inv, Role::inverted("consist-of"));
        assert_eq!(inv.printed(), "consist-of-of");
    }

    #[test]
    fn test_arg_roles() {
        assert_eq!(Role::parse("ARG0").unwrap(), Role::new("ARG0"));
        assert_eq!(Role::parse("ARG0-of").unwrap(), Role::inverted("ARG0"));
        assert_eq!(Role::parse("op1").unwrap(), Role::new("op1"));
    }

    #[test]
    fn test_malformed_labels() {
        assert!(Role::parse("").is_err());
        assert!(Role::parse("-of").is_err());
        assert!(Role::parse("ARG0-").is_err());
        assert!(Role::parse("a b").is_err());
        assert!(Role::parse("(x").is_err());
    }
}
