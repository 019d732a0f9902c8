//! Unity player build pipeline for CI.
//!
//! This library drives the Unity editor in batch mode and post-processes its
//! output into a shippable artifact:
//! - iOS Xcode projects exported to .ipa (fastlane gym)
//! - Windows players archived to .zip
//! - macOS apps wrapped in an installer package (pkgbuild)
//! - Android, Linux and Switch players used as-is
//!
//! It can be used both as a GitHub Action binary and as a library dependency.

pub mod build;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{ActionError, CliError, Result};
