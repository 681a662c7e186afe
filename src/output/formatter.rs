//! Output formatter trait and factory.
//!
//! This module defines the `RuleFormatter` trait that every target format
//! implements, the naming parameters shared by all of them, and a factory
//! that picks the formatter for a `TargetFormat`.

use thiserror::Error;

use crate::rules::{RuleSet, TargetFormat, ViewError};

/// Errors that can occur while rendering a rule set.
///
/// These indicate either a bug in a formatter or input the decoder accepted
/// but a format cannot express. Both abort the run.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Per-run naming parameters substituted into every output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// LXD container the script targets; also the profile name
    pub container_name: String,
    /// Name of the `aws_security_group` data source the rules attach to
    pub security_group: String,
}

/// Trait for rendering a rule set into one target format.
///
/// Implementations select their own rules from the full set, so the same
/// `RuleSet` can be passed to every formatter.
pub trait RuleFormatter {
    /// Renders the rules into the complete text of the output file.
    fn format(&self, rules: &RuleSet, context: &RenderContext) -> Result<String, RenderError>;

    /// Returns the format this formatter produces.
    fn target(&self) -> TargetFormat;
}

/// Creates the formatter for the given target format.
pub fn create_formatter(format: TargetFormat) -> Box<dyn RuleFormatter> {
    use super::hcl::HclFormatter;
    use super::profile::ProfileFormatter;
    use super::script::ScriptFormatter;

    match format {
        TargetFormat::SecurityGroup => Box::new(HclFormatter),
        TargetFormat::ProxyScript => Box::new(ScriptFormatter),
        TargetFormat::ProxyProfile => Box::new(ProfileFormatter),
    }
}
