//! LXD profile formatter.
//!
//! Renders the same proxy devices as the shell script, but as a declarative
//! profile document that can be applied with `lxc profile edit <name>`:
//!
//! ```yaml
//! devices:
//!   ssh:
//!     connect: tcp:127.0.0.1:22
//!     listen: tcp:10.0.0.0:22
//!     type: proxy
//! name: csls
//! ```

use std::fmt::Write;

use super::formatter::{RenderContext, RenderError, RuleFormatter};
use crate::rules::{RuleSet, TargetFormat, proxy_rules};

/// LXD device type for every generated device.
const DEVICE_TYPE: &str = "proxy";

/// Formatter that outputs an LXD profile YAML document.
pub struct ProfileFormatter;

impl RuleFormatter for ProfileFormatter {
    fn format(&self, rules: &RuleSet, context: &RenderContext) -> Result<String, RenderError> {
        let proxies = proxy_rules(TargetFormat::ProxyProfile, rules)?;

        let mut out = String::new();

        if proxies.is_empty() {
            out.push_str("devices: {}\n");
        } else {
            out.push_str("devices:\n");
            for proxy in &proxies {
                writeln!(out, "  {}:", yaml_scalar(proxy.name))?;
                writeln!(out, "    connect: {}", yaml_scalar(&proxy.connect))?;
                writeln!(out, "    listen: {}", yaml_scalar(&proxy.listen()))?;
                writeln!(out, "    type: {}", DEVICE_TYPE)?;
            }
        }

        writeln!(out, "name: {}", yaml_scalar(&context.container_name))?;

        Ok(out)
    }

    fn target(&self) -> TargetFormat {
        TargetFormat::ProxyProfile
    }
}

/// Returns `value` as a YAML scalar, double-quoting it unless it reads back
/// as the same plain string.
fn yaml_scalar(value: &str) -> String {
    if is_plain_safe(value) {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04X}", c as u32)),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn is_plain_safe(value: &str) -> bool {
    const RESERVED: [&str; 9] = ["true", "false", "yes", "no", "on", "off", "null", "y", "n"];

    let Some(first) = value.chars().next() else {
        return false;
    };

    first.is_ascii_alphanumeric()
        && !value.ends_with(':')
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':'))
        && value.parse::<f64>().is_err()
        && !value.starts_with("0x")
        && !value.starts_with("0o")
        && !RESERVED.iter().any(|r| value.eq_ignore_ascii_case(r))
}
