//! Core BuildConfiguration struct and implementations.

use super::{AndroidSigning, BuildTarget, Configuration, EditorSettings, ExportPolicy, IosSigning};
use std::path::{Path, PathBuf};

/// Immutable input bundle for one pipeline run.
///
/// Constructed once via [`SettingsBuilder`](super::SettingsBuilder) and
/// passed by reference to every stage.
///
/// # Examples
///
/// ```no_run
/// use unity_build_action::build::{BuildTarget, SettingsBuilder};
///
/// # fn example() -> unity_build_action::build::Result<()> {
/// let config = SettingsBuilder::new()
///     .build_target(BuildTarget::Win64)
///     .project_directory("./Game")
///     .output_directory("./Build")
///     .output_name("Game")
///     .build()?;
/// assert_eq!(config.output_name(), "Game");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BuildConfiguration {
    build_target: BuildTarget,
    project_directory: PathBuf,
    output_directory: PathBuf,
    temporary_directory: PathBuf,
    output_name: String,
    revision: u32,
    bundle_version: Option<String>,
    configuration: Configuration,
    app_id: Option<String>,
    ios: IosSigning,
    android: AndroidSigning,
    export: ExportPolicy,
    execute_method: Option<String>,
    editor: EditorSettings,
    install_location: String,
}

impl BuildConfiguration {
    /// Returns the build target.
    pub fn build_target(&self) -> BuildTarget {
        self.build_target
    }

    /// Returns the editor project root.
    pub fn project_directory(&self) -> &Path {
        &self.project_directory
    }

    /// Returns the directory the final artifact lands in.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Returns the scratch directory for intermediate build output and
    /// generated documents.
    pub fn temporary_directory(&self) -> &Path {
        &self.temporary_directory
    }

    /// Returns the artifact base name (no extension).
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Returns the monotonic build counter.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Returns the player bundle version, if configured.
    pub fn bundle_version(&self) -> Option<&str> {
        self.bundle_version.as_deref()
    }

    /// Returns the build configuration.
    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    /// Returns the application identifier, if configured.
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    /// Returns iOS signing material.
    pub fn ios(&self) -> &IosSigning {
        &self.ios
    }

    /// Returns Android signing material.
    pub fn android(&self) -> &AndroidSigning {
        &self.android
    }

    /// Returns the iOS export policy.
    pub fn export_policy(&self) -> &ExportPolicy {
        &self.export
    }

    /// Returns the caller-supplied `-executeMethod` override.
    pub fn execute_method(&self) -> Option<&str> {
        self.execute_method.as_deref()
    }

    /// Returns editor invocation settings.
    pub fn editor(&self) -> &EditorSettings {
        &self.editor
    }

    /// Returns the pkgbuild install location.
    pub fn install_location(&self) -> &str {
        &self.install_location
    }

    /// Creates a new BuildConfiguration (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        build_target: BuildTarget,
        project_directory: PathBuf,
        output_directory: PathBuf,
        temporary_directory: PathBuf,
        output_name: String,
        revision: u32,
        bundle_version: Option<String>,
        configuration: Configuration,
        app_id: Option<String>,
        ios: IosSigning,
        android: AndroidSigning,
        export: ExportPolicy,
        execute_method: Option<String>,
        editor: EditorSettings,
        install_location: String,
    ) -> Self {
        Self {
            build_target,
            project_directory,
            output_directory,
            temporary_directory,
            output_name,
            revision,
            bundle_version,
            configuration,
            app_id,
            ios,
            android,
            export,
            execute_method,
            editor,
            install_location,
        }
    }
}
