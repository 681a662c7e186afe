//! LXD proxy device shell script formatter.
//!
//! Emits a bash script that adds one `proxy` device per forwardable rule to a
//! container, e.g.
//!
//! ```text
//! lxc config device add csls ssh proxy listen=tcp:10.0.0.0:22 connect=tcp:127.0.0.1:22
//! ```

use std::fmt::Write;

use super::formatter::{RenderContext, RenderError, RuleFormatter};
use crate::rules::{RuleSet, TargetFormat, proxy_rules};

const SHEBANG: &str = "#!/usr/bin/env bash";

/// Formatter that outputs an executable `lxc` command script.
pub struct ScriptFormatter;

impl RuleFormatter for ScriptFormatter {
    fn format(&self, rules: &RuleSet, context: &RenderContext) -> Result<String, RenderError> {
        let proxies = proxy_rules(TargetFormat::ProxyScript, rules)?;

        let mut out = String::new();
        writeln!(out, "{}", SHEBANG)?;

        for proxy in &proxies {
            writeln!(
                out,
                "lxc config device add {} {} proxy listen={} connect={}",
                context.container_name,
                proxy.name,
                proxy.listen(),
                proxy.connect
            )?;
        }

        Ok(out)
    }

    fn target(&self) -> TargetFormat {
        TargetFormat::ProxyScript
    }
}
