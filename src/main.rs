//! Unity build action - builds a Unity player in CI and packages it.
//!
//! Exit code 0 means the artifact was produced and reported; 1 means the
//! failure was reported as a workflow error annotation.

use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = unity_build_action::cli::run().await;

    process::exit(exit_code);
}
