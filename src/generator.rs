//! Generation pipeline.
//!
//! Reads the rule file once, then renders and writes each target format in
//! turn: Terraform, proxy script (made executable), and optionally the LXD
//! profile. The first fatal error stops the run; files written before it are
//! left in place.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{FwgenError, Result};
use crate::output::{ArtifactWriter, OutputWriter, RenderContext, create_formatter};
use crate::rules::{self, RuleSet, TargetFormat};

/// One file produced by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutput {
    pub target: TargetFormat,
    pub path: PathBuf,
    /// Number of rules the format included
    pub rule_count: usize,
}

/// Result of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub outputs: Vec<WrittenOutput>,
}

/// Drives decoding, rendering and writing for one invocation.
pub struct Generator<'a, W = OutputWriter> {
    config: &'a Config,
    context: RenderContext,
    writer: W,
}

impl<'a> Generator<'a> {
    /// Creates a generator that writes to the filesystem.
    pub fn new(config: &'a Config) -> Self {
        Self::with_writer(config, OutputWriter::new())
    }
}

impl<'a, W: ArtifactWriter> Generator<'a, W> {
    pub fn with_writer(config: &'a Config, writer: W) -> Self {
        Self {
            config,
            context: config.render_context(),
            writer,
        }
    }

    /// Runs the full pipeline for the configured rule file.
    pub fn run(&self) -> Result<GenerationSummary> {
        let rules = self.load_rules()?;
        self.generate(&rules)
    }

    /// Reads and decodes the rule file.
    pub fn load_rules(&self) -> Result<RuleSet> {
        let path = &self.config.rules_file;

        let content = fs::read_to_string(path).map_err(|source| FwgenError::InputOpen {
            path: path.clone(),
            source,
        })?;

        let rules = rules::decode(&content).map_err(|source| FwgenError::Decode {
            path: path.clone(),
            source,
        })?;

        log::debug!("Loaded {} rules from {}", rules.len(), path.display());

        Ok(rules)
    }

    /// Renders and writes every enabled target for an already decoded rule set.
    pub fn generate(&self, rules: &RuleSet) -> Result<GenerationSummary> {
        let mut summary = GenerationSummary::default();

        for (target, path) in self.targets() {
            let written = self.generate_target(target, path, rules)?;
            summary.outputs.push(written);
        }

        Ok(summary)
    }

    /// Targets in write order, paired with their output paths.
    fn targets(&self) -> Vec<(TargetFormat, &Path)> {
        let mut targets = vec![
            (
                TargetFormat::SecurityGroup,
                self.config.terraform_output.as_path(),
            ),
            (
                TargetFormat::ProxyScript,
                self.config.script_output.as_path(),
            ),
        ];

        if let Some(profile) = &self.config.profile_output {
            targets.push((TargetFormat::ProxyProfile, profile.as_path()));
        }

        targets
    }

    fn generate_target(
        &self,
        target: TargetFormat,
        path: &Path,
        rules: &RuleSet,
    ) -> Result<WrittenOutput> {
        let formatter = create_formatter(target);

        let text = formatter
            .format(rules, &self.context)
            .map_err(|source| FwgenError::Render { target, source })?;

        self.writer.write(path, &text)?;

        if target.is_executable() {
            if let Err(err) = self.writer.set_executable(path) {
                log::warn!("{}", err);
            }
        }

        let rule_count = rules.iter().filter(|rule| target.includes(rule)).count();
        log::info!(
            "Written: {} ({} {})",
            path.display(),
            rule_count,
            if rule_count == 1 { "rule" } else { "rules" }
        );

        Ok(WrittenOutput {
            target,
            path: path.to_path_buf(),
            rule_count,
        })
    }
}
