use std::path::PathBuf;

use clap::Parser;

/// Firewall rule generator
///
/// Reads a YAML list of firewall rules and generates Terraform
/// aws_security_group_rule resources, a bash script of LXD proxy devices and
/// an LXD profile from it.
///
/// ICMP and egress rules are only written to the Terraform output; the proxy
/// outputs forward TCP/UDP ingress rules to 127.0.0.1 inside the container.
#[derive(Parser, Debug)]
#[command(name = "fwgen")]
#[command(version)]
#[command(about, long_about)]
pub struct Cli {
    /// Path to the YAML rule file
    #[arg(
        short = 'c',
        long = "config",
        env = "FWGEN_CONFIG",
        default_value = "firewall.yaml"
    )]
    pub config: PathBuf,

    /// Output path for the Terraform security group rules
    #[arg(short = 't', long = "terraform", default_value = "sg_rules.tf")]
    pub terraform: PathBuf,

    /// Output path for the LXD proxy device script
    #[arg(short = 's', long = "script", default_value = "firewall.sh")]
    pub script: PathBuf,

    /// Output path for the LXD profile
    #[arg(short = 'p', long = "profile", default_value = "firewall-profile.yaml")]
    pub profile: PathBuf,

    /// Do not generate the LXD profile
    #[arg(long = "no-profile")]
    pub no_profile: bool,

    /// LXD container the script configures; also used as the profile name
    #[arg(long = "container", default_value = "csls")]
    pub container: String,

    /// Name of the aws_security_group data source the rules attach to
    #[arg(short = 'g', long = "security-group", default_value = "northflier")]
    pub security_group: String,

    /// Suppress colored output (useful for CI/CD pipelines)
    #[arg(short = 'n', long = "no-color")]
    pub no_color: bool,

    /// Enable verbose output for debugging
    #[arg(long = "verbose", conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report warnings and errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}
