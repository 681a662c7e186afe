//! Terraform security group formatter.
//!
//! This module provides the `HclFormatter` which renders every rule as an
//! `aws_security_group_rule` resource attached to an existing
//! `aws_security_group` data source. Blocks follow rule order and are
//! separated by a blank line.

use std::fmt::Write;

use super::formatter::{RenderContext, RenderError, RuleFormatter};
use crate::rules::{Rule, RuleSet, TargetFormat, view::select};

/// Terraform resource type emitted for each rule.
const RESOURCE_TYPE: &str = "aws_security_group_rule";

/// Formatter that outputs one Terraform resource block per rule.
pub struct HclFormatter;

impl RuleFormatter for HclFormatter {
    fn format(&self, rules: &RuleSet, context: &RenderContext) -> Result<String, RenderError> {
        let mut out = String::new();

        for (i, rule) in select(TargetFormat::SecurityGroup, rules)
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                out.push('\n');
            }
            write_resource(&mut out, rule, context)?;
        }

        Ok(out)
    }

    fn target(&self) -> TargetFormat {
        TargetFormat::SecurityGroup
    }
}

fn write_resource(out: &mut String, rule: &Rule, context: &RenderContext) -> std::fmt::Result {
    writeln!(
        out,
        "resource \"{}\" \"{}\" {{",
        RESOURCE_TYPE,
        escape_string(&rule.name)
    )?;
    writeln!(out, "  type              = \"{}\"", rule.direction)?;
    writeln!(out, "  from_port         = {}", rule.from_port)?;
    writeln!(out, "  to_port           = {}", rule.to_port)?;
    writeln!(out, "  protocol          = \"{}\"", escape_string(&rule.protocol))?;
    writeln!(
        out,
        "  security_group_id = data.aws_security_group.{}.id",
        context.security_group
    )?;
    writeln!(out, "  cidr_blocks       = {}", format_string_list(&rule.cidr_blocks))?;
    writeln!(out, "  description       = \"{}\"", escape_string(&rule.description))?;
    writeln!(out, "}}")
}

/// Formats a list of strings as an inline HCL tuple.
fn format_string_list(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", escape_string(v)))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Escapes a value for use inside an HCL quoted string.
///
/// Besides quotes and backslashes, template sequences (`${`, `%{`) are
/// doubled so Terraform does not interpolate user text.
fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                escaped.push(c);
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }

    escaped
}
