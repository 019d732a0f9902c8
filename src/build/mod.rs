//! Unity player build pipeline.
//!
//! The pipeline turns one validated [`BuildConfiguration`] into a shipped
//! artifact:
//!
//! 1. Reads configuration from [`BuildConfiguration`]
//! 2. Generates the editor build script and runs the editor in batch mode
//! 3. Delegates to the platform module for the target's post-processing
//! 4. Returns a [`BuildOutcome`] with the artifact path and checksum
//!
//! # Module Organization
//!
//! - [`builder`] - [`Builder`] orchestrator, process runner, checksums
//! - [`editor`] - editor lookup, build script, define symbols, keystore
//! - [`platform`] - per-target table plus iOS, Windows and macOS steps
//! - [`settings`] - configuration types and [`SettingsBuilder`]
//! - [`error`] - [`Error`] and context helpers

pub mod builder;
pub mod command;
pub mod editor;
pub mod error;
pub mod platform;
pub mod settings;

pub use builder::{BuildOutcome, Builder, CommandRunner, SystemRunner};
pub use command::{ArgumentBuilder, CommandLine};
pub use error::{Context, Error, ErrorExt, Result};
pub use platform::PostprocessKind;
pub use settings::{
    AndroidSigning, BuildConfiguration, BuildTarget, Configuration, EditorSettings,
    ExportPolicy, IosSigning, KeystoreSource, SettingsBuilder,
};
