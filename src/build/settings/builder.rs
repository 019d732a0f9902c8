//! Builder for constructing BuildConfiguration.

use super::{
    AndroidSigning, BuildConfiguration, BuildTarget, Configuration, EditorSettings, ExportPolicy,
    IosSigning,
};
use crate::build::error::{Context, Result};
use std::path::{Path, PathBuf};

/// Builder for constructing [`BuildConfiguration`].
///
/// Provides a fluent API with validation. Empty strings passed to optional
/// setters are treated as absent, matching how CI inputs arrive.
///
/// # Examples
///
/// ```no_run
/// use unity_build_action::build::{BuildTarget, Configuration, IosSigning, SettingsBuilder};
///
/// # fn example() -> unity_build_action::build::Result<()> {
/// let config = SettingsBuilder::new()
///     .build_target(BuildTarget::Ios)
///     .project_directory("Game")
///     .output_directory("Build")
///     .temporary_directory("Temp/Xcode")
///     .output_name("Game")
///     .configuration(Configuration::Release)
///     .ios_signing(IosSigning {
///         team_id: Some("ABCDE12345".into()),
///         provisioning_profile_name: Some("Game Distribution".into()),
///         ..Default::default()
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    build_target: Option<BuildTarget>,
    project_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    temporary_directory: Option<PathBuf>,
    output_name: Option<String>,
    revision: u32,
    bundle_version: Option<String>,
    configuration: Configuration,
    app_id: Option<String>,
    ios: IosSigning,
    android: AndroidSigning,
    export: ExportPolicy,
    execute_method: Option<String>,
    editor: EditorSettings,
    install_location: Option<String>,
}

/// Normalizes an optional CI value: blank strings become `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the build target.
    ///
    /// # Required
    pub fn build_target(mut self, target: BuildTarget) -> Self {
        self.build_target = Some(target);
        self
    }

    /// Sets the project root.
    ///
    /// # Required
    pub fn project_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory.
    ///
    /// # Required
    pub fn output_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the temporary directory.
    ///
    /// Default: `<system temp>/unity-build`
    pub fn temporary_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.temporary_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the artifact base name.
    ///
    /// # Required
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Sets the build counter.
    ///
    /// Default: 0
    pub fn revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// Sets the player bundle version.
    pub fn bundle_version(mut self, version: impl Into<String>) -> Self {
        self.bundle_version = non_empty(Some(version.into()));
        self
    }

    /// Sets the build configuration.
    ///
    /// Default: Release
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Sets the application identifier.
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = non_empty(Some(app_id.into()));
        self
    }

    /// Sets iOS signing material.
    pub fn ios_signing(mut self, signing: IosSigning) -> Self {
        self.ios = IosSigning {
            team_id: non_empty(signing.team_id),
            provisioning_profile_uuid: non_empty(signing.provisioning_profile_uuid),
            provisioning_profile_name: non_empty(signing.provisioning_profile_name),
            provisioning_profile_type: non_empty(signing.provisioning_profile_type),
        };
        self
    }

    /// Sets Android signing material.
    pub fn android_signing(mut self, signing: AndroidSigning) -> Self {
        self.android = AndroidSigning {
            keystore: signing.keystore,
            keystore_password: non_empty(signing.keystore_password),
            keystore_alias: non_empty(signing.keystore_alias),
            keystore_alias_password: non_empty(signing.keystore_alias_password),
        };
        self
    }

    /// Sets the iOS export policy.
    pub fn export_policy(mut self, policy: ExportPolicy) -> Self {
        self.export = policy;
        self
    }

    /// Overrides the generated entry point with a caller-supplied method.
    pub fn execute_method(mut self, method: impl Into<String>) -> Self {
        self.execute_method = non_empty(Some(method.into()));
        self
    }

    /// Sets editor invocation settings.
    pub fn editor(mut self, editor: EditorSettings) -> Self {
        self.editor = editor;
        self
    }

    /// Sets the pkgbuild install location.
    ///
    /// Default: "/Applications"
    pub fn install_location(mut self, location: impl Into<String>) -> Self {
        self.install_location = non_empty(Some(location.into()));
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing, or if the output
    /// name is blank or contains a path separator.
    pub fn build(self) -> Result<BuildConfiguration> {
        let output_name = non_empty(self.output_name).context("output_name is required")?;
        if output_name.contains(['/', '\\']) {
            crate::bail!("output_name must be a file name, got {output_name:?}");
        }

        let temporary_directory = self
            .temporary_directory
            .unwrap_or_else(|| std::env::temp_dir().join("unity-build"));

        Ok(BuildConfiguration::new(
            self.build_target.context("build_target is required")?,
            self.project_directory
                .context("project_directory is required")?,
            self.output_directory
                .context("output_directory is required")?,
            temporary_directory,
            output_name,
            self.revision,
            self.bundle_version,
            self.configuration,
            self.app_id,
            self.ios,
            self.android,
            self.export,
            self.execute_method,
            self.editor,
            self.install_location
                .unwrap_or_else(|| "/Applications".to_string()),
        ))
    }
}
