//! Per-format rule selection.
//!
//! The security group output carries every rule. The proxy outputs (shell
//! script and LXD profile) only carry rules a loopback proxy can serve: ICMP has
//! no port to forward and egress rules have nothing to listen on.

use std::fmt;

use thiserror::Error;

use super::derive::derive;
use super::{Direction, Rule, RuleSet};

/// Errors raised while building a per-format view.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Rule '{0}' has no CIDR block to listen on")]
    MissingCidr(String),
}

/// The artifacts fwgen can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// Terraform `aws_security_group_rule` resources
    SecurityGroup,
    /// Bash script of `lxc config device add` commands
    ProxyScript,
    /// LXD profile with one proxy device per rule
    ProxyProfile,
}

impl TargetFormat {
    /// Returns whether a rule belongs in this format's output.
    pub fn includes(&self, rule: &Rule) -> bool {
        match self {
            TargetFormat::SecurityGroup => true,
            TargetFormat::ProxyScript | TargetFormat::ProxyProfile => {
                !rule.is_icmp() && rule.direction != Direction::Egress
            }
        }
    }

    /// Returns whether the written file should be marked executable.
    pub fn is_executable(&self) -> bool {
        matches!(self, TargetFormat::ProxyScript)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::SecurityGroup => "terraform",
            TargetFormat::ProxyScript => "script",
            TargetFormat::ProxyProfile => "profile",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rule as seen by the proxy outputs, with its derived fields resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRule<'a> {
    pub name: &'a str,
    pub protocol: &'a str,
    pub address: &'a str,
    pub port_range: String,
    pub connect: String,
}

impl ProxyRule<'_> {
    /// Listen specification, e.g. `tcp:10.0.0.0:22`.
    ///
    /// The forwarded-port override only affects `connect`; the listen side
    /// always uses the rule's own ports.
    pub fn listen(&self) -> String {
        format!("{}:{}{}", self.protocol, self.address, self.port_range)
    }
}

/// Returns the rules included in `format`, in rule-set order.
pub fn select(format: TargetFormat, rules: &RuleSet) -> Vec<&Rule> {
    rules
        .iter()
        .filter(|rule| {
            let included = format.includes(rule);
            if !included {
                log::debug!(
                    "Skipping {} {} rule '{}' for {} output",
                    rule.protocol,
                    rule.direction,
                    rule.name,
                    format
                );
            }
            included
        })
        .collect()
}

/// Builds the proxy view shared by the script and profile outputs.
///
/// Fails if an included rule has no CIDR block, since its listen address
/// cannot be derived.
pub fn proxy_rules<'a>(
    format: TargetFormat,
    rules: &'a RuleSet,
) -> Result<Vec<ProxyRule<'a>>, ViewError> {
    select(format, rules)
        .into_iter()
        .map(|rule| -> Result<ProxyRule<'a>, ViewError> {
            let fields = derive(rule);
            let address = fields
                .address
                .ok_or_else(|| ViewError::MissingCidr(rule.name.clone()))?;

            Ok(ProxyRule {
                name: &rule.name,
                protocol: &rule.protocol,
                address,
                port_range: fields.port_range,
                connect: fields.connect,
            })
        })
        .collect()
}
