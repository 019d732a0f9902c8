//! iOS export: Xcode project to .ipa via fastlane gym.

mod export_options;

pub use export_options::{EXPORT_OPTIONS_TEMPLATE, ExportOptions, generate_export_options};

use crate::build::{ArgumentBuilder, CommandLine, ErrorExt, Result, settings::BuildConfiguration};
use std::path::{Path, PathBuf};

/// Xcode scheme Unity generates.
pub const XCODE_SCHEME: &str = "Unity-iPhone";

/// Xcode container the export is driven from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum XcodeContainer {
    /// `Unity-iPhone.xcworkspace`, present when CocoaPods are in use.
    Workspace(PathBuf),
    /// `Unity-iPhone.xcodeproj`.
    Project(PathBuf),
}

/// Picks the workspace when it exists, else the project.
///
/// Probe failures of any kind fall back to the project.
pub async fn locate_xcode_container(xcode_directory: &Path) -> XcodeContainer {
    let workspace = xcode_directory.join(format!("{XCODE_SCHEME}.xcworkspace"));
    match tokio::fs::metadata(&workspace).await {
        Ok(_) => XcodeContainer::Workspace(workspace),
        Err(_) => {
            XcodeContainer::Project(xcode_directory.join(format!("{XCODE_SCHEME}.xcodeproj")))
        }
    }
}

/// `fastlane gym` invocation exporting the .ipa into the output directory.
pub fn gym_command(
    config: &BuildConfiguration,
    export_options: &Path,
    container: &XcodeContainer,
) -> CommandLine {
    let policy = config.export_policy();
    let team_id = config.ios().team_id.as_deref().unwrap_or_default();

    let args = ArgumentBuilder::new()
        .append("gym")
        .append_value("--configuration", config.configuration().as_str())
        .append("--clean")
        .append_path("--export_options", export_options)
        .append_path("--output_directory", config.output_directory())
        .append_value("--output_name", config.output_name())
        .append_value("--scheme", XCODE_SCHEME)
        .append_value("--sdk", "iphoneos")
        .append("--silent")
        .append_value("--skip_build_archive", "false")
        .append("--skip_profile_detection")
        .append_value("--export_team_id", team_id)
        .append_value("--export_method", &policy.export_method)
        .append_value("--include_bitcode", policy.include_bitcode.to_string())
        .append_value("--include_symbols", policy.include_symbols.to_string());

    let args = match container {
        XcodeContainer::Workspace(path) => args.append_path("--workspace", path),
        XcodeContainer::Project(path) => args.append_path("--project", path),
    };
    args.into_command("fastlane")
}

/// Export step ready to run: the written plist and the gym invocation.
#[derive(Debug, Clone)]
pub struct IpaExport {
    /// Path of the written `ExportOptions.plist`.
    pub export_options: PathBuf,
    /// Rendered plist text.
    pub plist: String,
    /// `fastlane gym` invocation.
    pub command: CommandLine,
}

/// Prepares the export of the Xcode project in the temporary directory.
///
/// Returns `Ok(None)` without touching the disk when signing material is
/// incomplete. Otherwise writes `ExportOptions.plist` next to the Xcode
/// project and picks the container gym builds from.
pub async fn prepare_export(config: &BuildConfiguration) -> Result<Option<IpaExport>> {
    if !config.ios().can_export() {
        return Ok(None);
    }

    let plist = generate_export_options(&ExportOptions::from_config(config))?;
    let export_options = config.temporary_directory().join("ExportOptions.plist");
    tokio::fs::write(&export_options, &plist)
        .await
        .fs_context("writing export options", &export_options)?;

    let container = locate_xcode_container(config.temporary_directory()).await;
    log::debug!("Exporting from {container:?}");
    let command = gym_command(config, &export_options, &container);

    Ok(Some(IpaExport {
        export_options,
        plist,
        command,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Configuration, IosSigning, SettingsBuilder};
    use tempfile::TempDir;

    fn config(tmp: &Path) -> BuildConfiguration {
        SettingsBuilder::new()
            .build_target(crate::build::BuildTarget::Ios)
            .project_directory("/src/Game")
            .output_directory("/out")
            .temporary_directory(tmp)
            .output_name("Game")
            .configuration(Configuration::Debug)
            .ios_signing(IosSigning {
                team_id: Some("ABCDE12345".into()),
                provisioning_profile_name: Some("Game Dist".into()),
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn workspace_preferred_when_present() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            locate_xcode_container(dir.path()).await,
            XcodeContainer::Project(dir.path().join("Unity-iPhone.xcodeproj"))
        );

        std::fs::create_dir(dir.path().join("Unity-iPhone.xcworkspace")).unwrap();
        assert_eq!(
            locate_xcode_container(dir.path()).await,
            XcodeContainer::Workspace(dir.path().join("Unity-iPhone.xcworkspace"))
        );
    }

    #[tokio::test]
    async fn export_needs_team_and_profile() {
        let dir = TempDir::new().unwrap();
        let unsigned = SettingsBuilder::new()
            .build_target(crate::build::BuildTarget::Ios)
            .project_directory("/src/Game")
            .output_directory("/out")
            .temporary_directory(dir.path())
            .output_name("Game")
            .build()
            .unwrap();
        assert!(prepare_export(&unsigned).await.unwrap().is_none());
        assert!(!dir.path().join("ExportOptions.plist").exists());

        let export = prepare_export(&config(dir.path())).await.unwrap().unwrap();
        assert_eq!(export.export_options, dir.path().join("ExportOptions.plist"));
        assert_eq!(
            std::fs::read_to_string(&export.export_options).unwrap(),
            export.plist
        );
        assert_eq!(export.command.name(), "fastlane");
    }

    #[test]
    fn gym_arguments() {
        let config = config(Path::new("/tmp/xcode"));
        let command = gym_command(
            &config,
            Path::new("/tmp/xcode/ExportOptions.plist"),
            &XcodeContainer::Project("/tmp/xcode/Unity-iPhone.xcodeproj".into()),
        );
        assert_eq!(command.name(), "fastlane");
        assert_eq!(
            command.args,
            [
                "gym",
                "--configuration",
                "Debug",
                "--clean",
                "--export_options",
                "/tmp/xcode/ExportOptions.plist",
                "--output_directory",
                "/out",
                "--output_name",
                "Game",
                "--scheme",
                "Unity-iPhone",
                "--sdk",
                "iphoneos",
                "--silent",
                "--skip_build_archive",
                "false",
                "--skip_profile_detection",
                "--export_team_id",
                "ABCDE12345",
                "--export_method",
                "app-store",
                "--include_bitcode",
                "false",
                "--include_symbols",
                "true",
                "--project",
                "/tmp/xcode/Unity-iPhone.xcodeproj",
            ]
        );
    }
}
