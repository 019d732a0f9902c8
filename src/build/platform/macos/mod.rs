//! macOS installer packaging with `pkgbuild`.

mod package_plist;

pub use package_plist::{PackageComponent, generate_package_plist};

use crate::build::{ArgumentBuilder, CommandLine, ErrorExt, Result, settings::BuildConfiguration};
use std::path::{Path, PathBuf};

/// Where the installer package is written.
pub fn package_path(config: &BuildConfiguration) -> PathBuf {
    config
        .temporary_directory()
        .join(format!("{}.pkg", config.output_name()))
}

/// Version stamped into the package: the bundle version when set, else the
/// revision.
pub fn package_version(config: &BuildConfiguration) -> String {
    config
        .bundle_version()
        .map(str::to_string)
        .unwrap_or_else(|| config.revision().to_string())
}

/// `pkgbuild` invocation wrapping the output directory's `.app`.
pub fn pkgbuild_command(
    config: &BuildConfiguration,
    app_id: &str,
    component_plist: &Path,
    package: &Path,
) -> CommandLine {
    ArgumentBuilder::new()
        .append_path("--root", config.output_directory())
        .append_path("--component-plist", component_plist)
        .append_value("--identifier", app_id)
        .append_value("--version", package_version(config))
        .append_value("--install-location", config.install_location())
        .append(package.display().to_string())
        .into_command("pkgbuild")
}

/// Packaging step ready to run.
#[derive(Debug, Clone)]
pub struct InstallerPackage {
    /// `<tmp>/<name>.pkg`, produced once `command` succeeds.
    pub package: PathBuf,
    /// Rendered component plist.
    pub plist: String,
    /// `pkgbuild` invocation.
    pub command: CommandLine,
}

/// Writes the component plist for the `.app` in the output directory and
/// returns the `pkgbuild` step.
///
/// Returns `Ok(None)` when no application identifier is set.
pub async fn prepare_package(config: &BuildConfiguration) -> Result<Option<InstallerPackage>> {
    let Some(app_id) = config.app_id() else {
        return Ok(None);
    };

    let component = PackageComponent::new(format!("{}.app", config.output_name()));
    let plist = generate_package_plist(&component)?;
    let plist_path = config.temporary_directory().join("Package.plist");
    tokio::fs::write(&plist_path, &plist)
        .await
        .fs_context("writing component plist", &plist_path)?;

    let package = package_path(config);
    let command = pkgbuild_command(config, app_id, &plist_path, &package);
    Ok(Some(InstallerPackage {
        package,
        plist,
        command,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BuildTarget, SettingsBuilder};

    fn builder() -> crate::build::SettingsBuilder {
        SettingsBuilder::new()
            .build_target(BuildTarget::OsxUniversal)
            .project_directory("/src/Game")
            .output_directory("/out")
            .temporary_directory("/tmp/work")
            .output_name("Game")
            .revision(17)
    }

    #[test]
    fn pkgbuild_arguments() {
        let config = builder().build().unwrap();
        let command = pkgbuild_command(
            &config,
            "com.example.game",
            Path::new("/tmp/work/Package.plist"),
            &package_path(&config),
        );
        assert_eq!(command.name(), "pkgbuild");
        assert_eq!(
            command.args,
            [
                "--root",
                "/out",
                "--component-plist",
                "/tmp/work/Package.plist",
                "--identifier",
                "com.example.game",
                "--version",
                "17",
                "--install-location",
                "/Applications",
                "/tmp/work/Game.pkg",
            ]
        );
    }

    #[tokio::test]
    async fn packaging_needs_app_id() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = builder().temporary_directory(dir.path()).build().unwrap();
        assert!(prepare_package(&config).await.unwrap().is_none());
        assert!(!dir.path().join("Package.plist").exists());

        let config = builder()
            .temporary_directory(dir.path())
            .app_id("com.example.game")
            .build()
            .unwrap();
        let step = prepare_package(&config).await.unwrap().unwrap();
        assert_eq!(step.package, dir.path().join("Game.pkg"));
        assert!(step.plist.contains("<string>Game.app</string>"));
        assert!(dir.path().join("Package.plist").is_file());
        assert_eq!(step.command.name(), "pkgbuild");
    }

    #[test]
    fn bundle_version_preferred_over_revision() {
        let config = builder().bundle_version("2.1.0").build().unwrap();
        assert_eq!(package_version(&config), "2.1.0");
    }
}
