//! Command line interface for the build pipeline.
//!
//! Parses optional overrides, assembles the build context, runs the pipeline and
//! reports the outcome. The returned value is the process exit code.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::{OutputManager, format_bytes, format_duration};

use crate::config::BuildConfig;
use crate::error::{BundlerError, EXIT_USAGE, Result};
use crate::pipeline::{BuildReport, Pipeline};
use clap::Parser;
use clap::error::ErrorKind;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // clap exits with 2 on its own, which is the install stage's code.
            return Ok(match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            });
        }
    };

    init_logging(args.verbose);
    let runtime = RuntimeConfig::from(&args);

    match execute(&args, &runtime).await {
        Ok(report) => {
            print_report(&report, &runtime);
            Ok(0)
        }
        Err(e) => {
            report_error(&e, &runtime);
            Ok(e.exit_code())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .try_init();
}

/// Builds the context and runs every stage.
pub async fn execute(args: &Args, runtime: &RuntimeConfig) -> Result<BuildReport> {
    // The config file lives in the root, which must be resolved first.
    let root_probe = args.context_builder(&BuildConfig::default()).build()?;
    let config = BuildConfig::load(root_probe.root())?;
    let context = args.context_builder(&config).build()?;

    let output = runtime.output();
    let _ = output.verbose(&format!("Root: {}", context.root().display()));
    let _ = output.verbose(&format!("Script: {}", context.script().display()));
    let _ = output.verbose(&format!("Packages: {}", context.packages().join(" ")));

    let mut pipeline = Pipeline::new(context)
        .with_locator(args.locator(&config))
        .with_observer(output.clone());

    Ok(pipeline.run().await?)
}

fn print_report(report: &BuildReport, runtime: &RuntimeConfig) {
    let output = runtime.output();

    if report.environment.created {
        let _ = output.verbose("Build environment was created by this run");
    } else {
        let _ = output.verbose("Build environment was reused");
    }

    let published = &report.published;
    let _ = output.section("Build complete");
    let _ = output.success(&format!(
        "Published {} ({})",
        published.path.display(),
        format_bytes(published.size)
    ));
    let _ = output.indent(&format!("sha256 {}", published.checksum));
    let _ = output.warn(
        "The executable needs ffmpeg at run time: put ffmpeg on PATH or next to the \
         executable. It is not bundled.",
    );
}

fn report_error(error: &BundlerError, runtime: &RuntimeConfig) {
    let output = runtime.output();
    let _ = output.error(&error.to_string());
    if let BundlerError::Pipeline(e) = error {
        log::debug!("Captured diagnostics: {:?}", e.diagnostics());
    }
    for suggestion in error.recovery_suggestions() {
        let _ = output.indent_err(&suggestion);
    }
}
