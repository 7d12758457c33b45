//! Comprobador: run browser acceptance suites against the demo shop
//!
//! ## Usage
//!
//! ```bash
//! comprobador run                          # Run every suite headless
//! comprobador run --suite cart --headed    # One suite, visible browser
//! comprobador run --format json -o out.json
//! comprobador list                         # Show suites and scenarios
//! ```

use std::process::ExitCode;

use clap::Parser;
use comprobador::{
    execute, Cli, CliConfig, CliResult, ColorChoice, Commands, OutputFormat, Reporter, RunArgs,
    RunPlan, Verbosity,
};
use comprobar::suites::all_suites;
use comprobar::SiteConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match dispatch(cli, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli, config: CliConfig) -> CliResult<bool> {
    match cli.command {
        Commands::Run(args) => run_suites(&args, config).await,
        Commands::List => {
            list_suites();
            Ok(true)
        }
    }
}

async fn run_suites(args: &RunArgs, config: CliConfig) -> CliResult<bool> {
    let plan = RunPlan::from_args(args)?;
    let mut reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());

    let report = execute(&plan, &mut reporter).await?;
    reporter.summary(&report);

    let format: OutputFormat = args.format.into();
    let rendered = match format {
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Text => report.to_text(),
    };
    match &args.output {
        Some(path) => std::fs::write(path, rendered)?,
        None => {
            if format == OutputFormat::Json {
                println!("{rendered}");
            }
        }
    }

    Ok(report.all_passed())
}

fn list_suites() {
    for suite in all_suites(&SiteConfig::default()) {
        println!("{}", suite.name());
        for scenario in suite.scenarios() {
            println!("  - {}", scenario.name());
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

fn init_tracing(verbosity: Verbosity) {
    let default = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
        Verbosity::Debug => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
