//! Platform resolver and platform-specific post-processing.
//!
//! Every decision keyed by build target lives in the table below, so call
//! sites never branch on target names themselves.
//!
//! | Target | Extension | Post-processing | Editor writes to |
//! |--------|-----------|-----------------|------------------|
//! | iOS | `.ipa` | [`ios`] export via fastlane gym | temporary directory |
//! | Android | `.aab` | none | output directory |
//! | Win / Win64 | `.zip` | [`windows`] archive | `<temporary>/<name>-player` |
//! | OSXUniversal | `.app` | [`macos`] installer package | output directory |
//! | Linux64 | `.x86_64` | none | output directory |
//! | Switch | `.nsp` / `-development.nsp` | none | output directory |
//!
//! Any other target yields [`Error::UnsupportedPlatform`].

pub mod ios;
pub mod macos;
pub mod windows;

use crate::build::{
    Error, Result,
    settings::{BuildConfiguration, BuildTarget, Configuration},
};
use std::{fmt, path::PathBuf};

/// Post-processing branch applied after the editor build.
///
/// Branches are mutually exclusive; exactly one applies per target.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PostprocessKind {
    /// Export the generated Xcode project to an .ipa.
    IosExport,
    /// Compress the player directory into a .zip.
    WindowsArchive,
    /// Wrap the .app in an installer package.
    MacosPackage,
    /// The editor output is the final artifact.
    None,
}

impl PostprocessKind {
    /// Short name used in log output.
    pub fn short_name(&self) -> &'static str {
        match self {
            PostprocessKind::IosExport => "ios-export",
            PostprocessKind::WindowsArchive => "windows-archive",
            PostprocessKind::MacosPackage => "macos-package",
            PostprocessKind::None => "none",
        }
    }
}

impl fmt::Display for PostprocessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

fn unsupported(target: BuildTarget) -> Error {
    Error::UnsupportedPlatform {
        target: target.as_str().to_string(),
    }
}

/// Returns the artifact extension for `target`, including the leading dot.
///
/// Switch development builds carry a distinguishing suffix.
pub fn output_extension(
    target: BuildTarget,
    configuration: Configuration,
) -> Result<&'static str> {
    match target {
        BuildTarget::Ios => Ok(".ipa"),
        BuildTarget::Android => Ok(".aab"),
        BuildTarget::Win | BuildTarget::Win64 => Ok(".zip"),
        BuildTarget::OsxUniversal => Ok(".app"),
        BuildTarget::Linux64 => Ok(".x86_64"),
        BuildTarget::Switch => Ok(match configuration {
            Configuration::Debug => "-development.nsp",
            Configuration::Release => ".nsp",
        }),
        other => Err(unsupported(other)),
    }
}

/// Returns which post-processing branch applies to `target`.
pub fn postprocess_kind(target: BuildTarget) -> Result<PostprocessKind> {
    match target {
        BuildTarget::Ios => Ok(PostprocessKind::IosExport),
        BuildTarget::Win | BuildTarget::Win64 => Ok(PostprocessKind::WindowsArchive),
        BuildTarget::OsxUniversal => Ok(PostprocessKind::MacosPackage),
        BuildTarget::Android | BuildTarget::Linux64 | BuildTarget::Switch => {
            Ok(PostprocessKind::None)
        }
        other => Err(unsupported(other)),
    }
}

/// Returns whether any post-processing branch runs for `target`.
pub fn requires_postprocess(target: BuildTarget) -> Result<bool> {
    Ok(postprocess_kind(target)? != PostprocessKind::None)
}

/// Returns the directory the editor writes its player build into.
///
/// Targets whose post-processing transforms the editor output stage it under
/// the temporary directory; the rest write straight to the output directory.
pub fn editor_output_directory(config: &BuildConfiguration) -> Result<PathBuf> {
    Ok(match postprocess_kind(config.build_target())? {
        PostprocessKind::IosExport => config.temporary_directory().to_path_buf(),
        PostprocessKind::WindowsArchive => windows::staging_directory(config),
        PostprocessKind::MacosPackage | PostprocessKind::None => {
            config.output_directory().to_path_buf()
        }
    })
}

/// Computes `<output_directory>/<output_name><extension>`.
pub fn output_path(config: &BuildConfiguration) -> Result<PathBuf> {
    let extension = output_extension(config.build_target(), config.configuration())?;
    Ok(config
        .output_directory()
        .join(format!("{}{}", config.output_name(), extension)))
}
