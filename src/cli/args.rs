//! Command line argument parsing and validation.
//!
//! Every flag doubles as a GitHub Actions input: the runner exports
//! `with:` values as `INPUT_<NAME>` environment variables, which clap reads
//! when the flag is not given on the command line.

use super::{OutputManager, output::append_key_value};
use crate::{
    build::{
        AndroidSigning, BuildConfiguration, BuildTarget, Configuration, EditorSettings,
        ExportPolicy, IosSigning, KeystoreSource, SettingsBuilder, settings::non_empty,
    },
    error::{ActionError, CliError},
};
use clap::Parser;
use std::{future::Future, path::PathBuf};

/// Parses an Actions boolean input.
///
/// An empty value means the input was left blank and reads as `false`.
fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "0" => Ok(false),
        "true" | "yes" | "1" => Ok(true),
        other => Err(format!("expected true or false, got {other:?}")),
    }
}

/// Build a Unity player and package it for distribution
#[derive(Parser, Debug)]
#[command(
    name = "unity_build_action",
    version,
    about = "Build a Unity player and package it for distribution",
    long_about = "Runs the Unity editor in batch mode to build a player, then post-processes it:
iOS Xcode projects are exported to .ipa with fastlane gym, Windows players are zipped,
and macOS apps are wrapped in an installer package.

Every option can also be supplied through the matching INPUT_<NAME> environment
variable, which is how GitHub Actions passes `with:` inputs.

Usage:
  unity_build_action --build-target Android --output-directory Build --output-name Game
  INPUT_BUILD-TARGET=iOS INPUT_TEAM-ID=ABCDE12345 unity_build_action

Exit code 0 = the artifact was produced and its path reported as `output-path`."
)]
pub struct Args {
    /// Build target: iOS, Android, Win, Win64, OSXUniversal, Linux64, Switch
    #[arg(long, env = "INPUT_BUILD-TARGET", value_name = "TARGET")]
    pub build_target: String,

    /// Unity project root
    #[arg(long, env = "INPUT_PROJECT-DIRECTORY", value_name = "DIR", default_value = ".")]
    pub project_directory: PathBuf,

    /// Directory the final artifact is written to
    #[arg(long, env = "INPUT_OUTPUT-DIRECTORY", value_name = "DIR")]
    pub output_directory: PathBuf,

    /// Staging directory for intermediate files
    #[arg(long, env = "INPUT_TEMPORARY-DIRECTORY", value_name = "DIR")]
    pub temporary_directory: Option<PathBuf>,

    /// Artifact base name, without extension
    #[arg(long, env = "INPUT_OUTPUT-NAME", value_name = "NAME")]
    pub output_name: String,

    /// Build counter (iOS build number, Android version code)
    #[arg(long, env = "INPUT_REVISION", default_value_t = 0)]
    pub revision: u32,

    /// Player bundle version
    #[arg(long, env = "INPUT_BUNDLE-VERSION")]
    pub bundle_version: Option<String>,

    /// Debug or Release
    #[arg(long, env = "INPUT_CONFIGURATION", default_value = "Release")]
    pub configuration: String,

    /// Application identifier (bundle ID / package name)
    #[arg(long, env = "INPUT_APP-ID")]
    pub app_id: Option<String>,

    /// Apple developer team ID
    #[arg(long, env = "INPUT_TEAM-ID")]
    pub team_id: Option<String>,

    /// Manual provisioning profile UUID
    #[arg(long, env = "INPUT_PROVISIONING-PROFILE-UUID")]
    pub provisioning_profile_uuid: Option<String>,

    /// Provisioning profile name used for export
    #[arg(long, env = "INPUT_PROVISIONING-PROFILE-NAME")]
    pub provisioning_profile_name: Option<String>,

    /// Provisioning profile type: development, distribution, automatic
    #[arg(long, env = "INPUT_PROVISIONING-PROFILE-TYPE")]
    pub provisioning_profile_type: Option<String>,

    /// fastlane export method
    #[arg(long, env = "INPUT_EXPORT-METHOD", default_value = "app-store")]
    pub export_method: String,

    /// Compile and upload bitcode
    #[arg(long, env = "INPUT_INCLUDE-BITCODE", value_parser = parse_flag, default_value = "false", action = clap::ArgAction::Set)]
    pub include_bitcode: bool,

    /// Upload symbols
    #[arg(long, env = "INPUT_INCLUDE-SYMBOLS", value_parser = parse_flag, default_value = "true", action = clap::ArgAction::Set)]
    pub include_symbols: bool,

    /// Strip Swift symbols from the exported .ipa
    #[arg(long, env = "INPUT_STRIP-SWIFT-SYMBOLS", value_parser = parse_flag, default_value = "true", action = clap::ArgAction::Set)]
    pub strip_swift_symbols: bool,

    /// Android keystore file
    #[arg(long, env = "INPUT_KEYSTORE", value_name = "PATH")]
    pub keystore: Option<PathBuf>,

    /// Android keystore contents, base64-encoded
    #[arg(long, env = "INPUT_KEYSTORE-BASE64", hide_env_values = true)]
    pub keystore_base64: Option<String>,

    /// Keystore password
    #[arg(long, env = "INPUT_KEYSTORE-PASSWORD", hide_env_values = true)]
    pub keystore_password: Option<String>,

    /// Key alias
    #[arg(long, env = "INPUT_KEYSTORE-ALIAS")]
    pub keystore_alias: Option<String>,

    /// Key alias password
    #[arg(long, env = "INPUT_KEYSTORE-ALIAS-PASSWORD", hide_env_values = true)]
    pub keystore_alias_password: Option<String>,

    /// Static method to run instead of the generated build script
    #[arg(long, env = "INPUT_EXECUTE-METHOD", value_name = "METHOD")]
    pub execute_method: Option<String>,

    /// Editor version, or `project` to use ProjectSettings/ProjectVersion.txt
    #[arg(long, env = "INPUT_UNITY-VERSION", default_value = "project")]
    pub unity_version: String,

    /// Explicit editor executable, bypassing Unity Hub lookup
    #[arg(long, env = "INPUT_UNITY-PATH", value_name = "PATH")]
    pub unity_path: Option<PathBuf>,

    /// Editor log file; `-` logs to stdout
    #[arg(long, env = "INPUT_LOG-FILE", default_value = "-")]
    pub log_file: String,

    /// Pass -enablePackageManagerTraces to the editor
    #[arg(long, env = "INPUT_ENABLE-PACKAGE-MANAGER-TRACES", value_parser = parse_flag, default_value = "true", action = clap::ArgAction::Set)]
    pub enable_package_manager_traces: bool,

    /// Extra editor arguments, space-separated, appended last
    #[arg(long, env = "INPUT_ADDITIONAL-ARGUMENTS", allow_hyphen_values = true)]
    pub additional_arguments: Option<String>,

    /// Scripting define symbols, separated by `;`
    #[arg(long, env = "INPUT_DEFINE-SYMBOLS")]
    pub define_symbols: Option<String>,

    /// pkgbuild install location
    #[arg(long, env = "INPUT_INSTALL-LOCATION", default_value = "/Applications")]
    pub install_location: String,

    /// Actions step output file
    #[arg(long, env = "GITHUB_OUTPUT", hide = true)]
    pub github_output: Option<PathBuf>,

    /// Actions environment file
    #[arg(long, env = "GITHUB_ENV", hide = true)]
    pub github_env: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    fn keystore_source(&self) -> Result<Option<KeystoreSource>, CliError> {
        let path = self.keystore.clone().filter(|p| !p.as_os_str().is_empty());
        match (path, non_empty(self.keystore_base64.clone())) {
            (Some(_), Some(_)) => Err(CliError::ConflictingInputs {
                inputs: vec!["keystore", "keystore-base64"],
            }),
            (Some(path), None) => Ok(Some(KeystoreSource::Path(path))),
            (None, Some(blob)) => Ok(Some(KeystoreSource::Base64(blob))),
            (None, None) => Ok(None),
        }
    }
}

impl TryFrom<&Args> for BuildConfiguration {
    type Error = ActionError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let build_target: BuildTarget = args.build_target.parse()?;
        let configuration: Configuration =
            args.configuration
                .parse()
                .map_err(|_| CliError::InvalidInput {
                    input: "configuration",
                    reason: format!("expected Debug or Release, got {:?}", args.configuration),
                })?;

        let editor = EditorSettings {
            version: non_empty(Some(args.unity_version.clone()))
                .unwrap_or_else(|| "project".to_string()),
            path: args.unity_path.clone().filter(|p| !p.as_os_str().is_empty()),
            log_file: non_empty(Some(args.log_file.clone())).unwrap_or_else(|| "-".to_string()),
            package_manager_traces: args.enable_package_manager_traces,
            additional_arguments: args
                .additional_arguments
                .as_deref()
                .map(|a| a.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            define_symbols: args
                .define_symbols
                .as_deref()
                .map(|d| {
                    d.split(';')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };

        let mut builder = SettingsBuilder::new()
            .build_target(build_target)
            .project_directory(&args.project_directory)
            .output_directory(&args.output_directory)
            .output_name(args.output_name.clone())
            .revision(args.revision)
            .configuration(configuration)
            .ios_signing(IosSigning {
                team_id: args.team_id.clone(),
                provisioning_profile_uuid: args.provisioning_profile_uuid.clone(),
                provisioning_profile_name: args.provisioning_profile_name.clone(),
                provisioning_profile_type: args.provisioning_profile_type.clone(),
            })
            .android_signing(AndroidSigning {
                keystore: args.keystore_source()?,
                keystore_password: args.keystore_password.clone(),
                keystore_alias: args.keystore_alias.clone(),
                keystore_alias_password: args.keystore_alias_password.clone(),
            })
            .export_policy(ExportPolicy {
                export_method: non_empty(Some(args.export_method.clone()))
                    .unwrap_or_else(|| "app-store".to_string()),
                include_bitcode: args.include_bitcode,
                include_symbols: args.include_symbols,
                strip_swift_symbols: args.strip_swift_symbols,
            })
            .editor(editor)
            .install_location(args.install_location.clone());

        if let Some(dir) = args
            .temporary_directory
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
        {
            builder = builder.temporary_directory(dir);
        }
        if let Some(version) = &args.bundle_version {
            builder = builder.bundle_version(version.clone());
        }
        if let Some(app_id) = &args.app_id {
            builder = builder.app_id(app_id.clone());
        }
        if let Some(method) = &args.execute_method {
            builder = builder.execute_method(method.clone());
        }

        Ok(builder.build()?)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: OutputManager,
    github_output: Option<PathBuf>,
    github_env: Option<PathBuf>,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: OutputManager::new(false),
            github_output: args.github_output.clone(),
            github_env: args.github_env.clone(),
        }
    }
}

impl RuntimeConfig {
    /// Creates a runtime that prints outputs instead of writing Actions files.
    pub fn new(output: OutputManager) -> Self {
        Self {
            output,
            github_output: None,
            github_env: None,
        }
    }

    /// Awaits `future` inside a collapsible log group.
    ///
    /// The group is closed whether or not the future succeeds.
    pub async fn group<F: Future>(&self, title: &str, future: F) -> F::Output {
        let _ = self.output.start_group(title);
        let result = future.await;
        let _ = self.output.end_group();
        result
    }

    /// Prints `body` inside a collapsible log group.
    pub fn log_group(&self, title: &str, body: &str) {
        let _ = self.output.start_group(title);
        let _ = self.output.println(&format!("{title}:\n{body}"));
        let _ = self.output.end_group();
    }

    /// Sets a step output, appending to `$GITHUB_OUTPUT` when available.
    pub fn set_output(&self, name: &str, value: &str) -> std::io::Result<()> {
        match &self.github_output {
            Some(file) => append_key_value(file, name, value),
            None => self.output.println(&format!("{name}={value}")),
        }
    }

    /// Exports an environment variable to later steps via `$GITHUB_ENV`.
    pub fn export_env(&self, name: &str, value: &str) -> std::io::Result<()> {
        match &self.github_env {
            Some(file) => append_key_value(file, name, value),
            None => self.output.println(&format!("{name}={value}")),
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Report a failure annotation
    pub fn error(&self, message: &str) {
        self.output.error(message)
    }
}
