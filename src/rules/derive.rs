//! Per-rule derived fields.
//!
//! Every output that forwards ports needs the same three values: the port
//! range suffix, the loopback connect endpoint and the address portion of the
//! first CIDR block. They are computed here once and never stored on the rule.

use super::Rule;

/// Loopback address every proxy device connects to.
pub const LOOPBACK_ADDRESS: &str = "127.0.0.1";

/// Values computed from a rule for proxy-style outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields<'a> {
    /// `":22"` or `":8000-8080"`
    pub port_range: String,
    /// `"tcp:127.0.0.1:22"`, honouring `lxc_forward`
    pub connect: String,
    /// Address of the first CIDR block, if the rule has one
    pub address: Option<&'a str>,
}

/// Computes all derived fields for a rule.
pub fn derive(rule: &Rule) -> DerivedFields<'_> {
    DerivedFields {
        port_range: port_range(rule.from_port, rule.to_port),
        connect: connect_endpoint(rule),
        address: cidr_address(rule),
    }
}

/// Formats a port range as a colon-prefixed suffix.
///
/// A single port renders as `":<port>"`, anything else as `":<from>-<to>"`.
/// No ordering check is made on the bounds.
pub fn port_range(from_port: i64, to_port: i64) -> String {
    if from_port == to_port {
        format!(":{}", from_port)
    } else {
        format!(":{}-{}", from_port, to_port)
    }
}

/// Builds the endpoint a proxy forwards accepted connections to.
///
/// A non-zero `lxc_forward` replaces the rule's own ports entirely.
pub fn connect_endpoint(rule: &Rule) -> String {
    let ports = match rule.forward_override() {
        Some(port) => format!(":{}", port),
        None => port_range(rule.from_port, rule.to_port),
    };

    format!("{}:{}{}", rule.protocol, LOOPBACK_ADDRESS, ports)
}

/// Returns the address part (before `/`) of the rule's first CIDR block.
///
/// Returns `None` when the rule has no CIDR blocks. A block without a prefix
/// length is returned unchanged.
pub fn cidr_address(rule: &Rule) -> Option<&str> {
    rule.cidr_blocks
        .first()
        .map(|block| block.split('/').next().unwrap_or(block))
}
