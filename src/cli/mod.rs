//! Command line interface for the Unity build action.
//!
//! Parses inputs, runs the build pipeline and reports the result the way
//! GitHub Actions expects: step outputs, an exported environment variable
//! and an `::error::` annotation on failure.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::{OutputManager, append_key_value, escape_data};

use crate::{
    build::{BuildConfiguration, BuildOutcome, Builder},
    error::Result,
};

/// Environment variable later workflow steps can read the artifact path from.
pub const OUTPUT_PATH_ENV: &str = "UNITY_BUILD_OUTPUT_PATH";

/// Main CLI entry point
///
/// Returns the process exit code: 0 on success, 1 on any failure after the
/// failure has been reported.
pub async fn run() -> i32 {
    let args = Args::parse_args();
    let runtime = RuntimeConfig::from(&args);

    match execute(&args, &runtime).await {
        Ok(()) => 0,
        Err(e) => {
            log::debug!("Build failed: {e:?}");
            runtime.error(&e.to_string());
            1
        }
    }
}

async fn execute(args: &Args, runtime: &RuntimeConfig) -> Result<()> {
    let config = BuildConfiguration::try_from(args)?;
    let outcome = Builder::new(config).run(runtime).await?;
    report(&outcome, runtime)
}

/// Publishes `outcome` as step outputs.
pub fn report(outcome: &BuildOutcome, runtime: &RuntimeConfig) -> Result<()> {
    let output_path = outcome.output_path.display().to_string();
    runtime.set_output("output-path", &output_path)?;
    runtime.export_env(OUTPUT_PATH_ENV, &output_path)?;

    if let Some(package) = &outcome.package_path {
        runtime.set_output("package-path", &package.display().to_string())?;
    }
    if let Some(checksum) = &outcome.checksum {
        runtime.set_output("output-checksum", checksum)?;
    }

    runtime.success(&format!("Output Path: {output_path}"))?;
    Ok(())
}
