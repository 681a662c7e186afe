use clap::Parser;
use colored::Colorize;
use fwgen::{cli::Cli, config::Config, generator::Generator, logging::init_logging};

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet, cli.no_color);

    let config = Config::from_cli(cli)?;

    log::debug!("Configuration: {:?}", config);

    let summary = Generator::new(&config).run()?;

    if summary.outputs.iter().all(|output| output.rule_count == 0) {
        log::warn!(
            "No rules found in {}, generated files are empty",
            config.rules_file.display()
        );
    }

    Ok(())
}
