//! Firewall rule model.
//!
//! This module holds the canonical in-memory representation of the rule file:
//! an ordered `RuleSet` of `Rule` entries. The decoder lives in `yaml_parser`,
//! per-rule derived fields in `derive`, and per-format selection in `view`.

pub mod derive;
pub mod view;
pub mod yaml_parser;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use derive::{DerivedFields, cidr_address, connect_endpoint, derive, port_range};
pub use view::{ProxyRule, TargetFormat, ViewError, proxy_rules};
pub use yaml_parser::{DecodeError, decode};

/// Protocol that has no ports and therefore no proxy device.
pub const ICMP_PROTOCOL: &str = "icmp";

/// Traffic direction of a rule, taken from the `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ingress,
    Egress,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ingress => "ingress",
            Direction::Egress => "egress",
        }
    }
}

/// Error returned when a `type` value is neither `ingress` nor `egress`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown direction '{0}'")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ingress" => Ok(Direction::Ingress),
            "egress" => Ok(Direction::Egress),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One access-control entry from the rule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub direction: Direction,
    pub from_port: i64,
    pub to_port: i64,
    pub protocol: String,
    /// CIDR blocks in file order. May be empty; nothing checks it at decode time.
    pub cidr_blocks: Vec<String>,
    pub description: String,
    /// Raw `lxc_forward` value. Use `forward_override` to read it.
    pub lxc_forward: Option<i64>,
}

impl Rule {
    /// Returns the forwarded-port override, treating `0` as unset.
    pub fn forward_override(&self) -> Option<i64> {
        self.lxc_forward.filter(|port| *port != 0)
    }

    pub fn is_icmp(&self) -> bool {
        self.protocol == ICMP_PROTOCOL
    }
}

/// Ordered collection of rules. Order is significant: every output follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
