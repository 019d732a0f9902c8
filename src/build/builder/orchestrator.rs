//! Main build pipeline orchestration.
//!
//! This module provides the [`Builder`] that drives one build from project
//! preparation through the editor run and platform post-processing to the
//! reported [`BuildOutcome`].

use super::{checksum::artifact_sha256, process::CommandRunner, process::SystemRunner};
use crate::{
    build::{
        ErrorExt, Result,
        editor::{self, BuildScriptParams, KeystoreFile},
        platform::{self, PostprocessKind},
        settings::{BuildConfiguration, BuildTarget},
    },
    cli::RuntimeConfig,
};
use std::path::{Path, PathBuf};

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// `<output_directory>/<output_name><extension>`.
    pub output_path: PathBuf,
    /// Installer package, when the macOS packaging step ran.
    pub package_path: Option<PathBuf>,
    /// Hex SHA-256 of `output_path`, when it exists on disk.
    pub checksum: Option<String>,
}

/// Build pipeline orchestrator.
///
/// Stages run strictly in order and the first failure aborts the run:
///
/// 1. **Preprocess**: create directories, inject define symbols
/// 2. **Build**: generate the build script and run the editor
/// 3. **Postprocess**: iOS export, Windows archive or macOS package
/// 4. **Finalize**: compute the output path and checksum
///
/// # Examples
///
/// ```no_run
/// use unity_build_action::build::{BuildTarget, Builder, SettingsBuilder};
/// use unity_build_action::cli::{OutputManager, RuntimeConfig};
///
/// # async fn example() -> unity_build_action::build::Result<()> {
/// let config = SettingsBuilder::new()
///     .build_target(BuildTarget::Android)
///     .project_directory("Game")
///     .output_directory("Build")
///     .output_name("Game")
///     .build()?;
///
/// let runtime = RuntimeConfig::new(OutputManager::new(false));
/// let outcome = Builder::new(config).run(&runtime).await?;
/// println!("{}", outcome.output_path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Builder<R = SystemRunner> {
    config: BuildConfiguration,
    runner: R,
}

impl Builder<SystemRunner> {
    /// Creates a builder that spawns real processes.
    pub fn new(config: BuildConfiguration) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: CommandRunner> Builder<R> {
    /// Creates a builder with a custom process runner.
    pub fn with_runner(config: BuildConfiguration, runner: R) -> Self {
        Self { config, runner }
    }

    /// Returns the configuration this builder runs with.
    pub fn config(&self) -> &BuildConfiguration {
        &self.config
    }

    /// Returns the process runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the whole pipeline.
    ///
    /// Unsupported targets are rejected before anything touches the disk.
    pub async fn run(&self, runtime: &RuntimeConfig) -> Result<BuildOutcome> {
        let output_path = platform::output_path(&self.config)?;
        let kind = platform::postprocess_kind(self.config.build_target())?;
        log::info!(
            "Building {} for {} ({}, postprocess: {kind})",
            self.config.output_name(),
            self.config.build_target(),
            self.config.configuration()
        );

        self.preprocess(kind).await?;
        self.build(runtime).await?;
        let package_path = self.postprocess(runtime, kind, &output_path).await?;
        self.finalize(output_path, package_path).await
    }

    async fn preprocess(&self, kind: PostprocessKind) -> Result<()> {
        for dir in [
            self.config.temporary_directory(),
            self.config.output_directory(),
        ] {
            tokio::fs::create_dir_all(dir)
                .await
                .fs_context("creating directory", dir)?;
        }
        if kind == PostprocessKind::WindowsArchive {
            platform::windows::prepare_staging(&self.config).await?;
        }

        editor::apply_define_symbols(
            self.config.project_directory(),
            self.config.build_target(),
            &self.config.editor().define_symbols,
        )
        .await
    }

    async fn build(&self, runtime: &RuntimeConfig) -> Result<()> {
        let editor_path = editor::resolve_editor(&self.config)?;

        // Held until the editor exits; a decoded keystore is deleted on drop.
        let mut keystore: Option<KeystoreFile> = None;

        let execute_method = match self.config.execute_method() {
            Some(method) => {
                log::info!("Using custom entry point {method}");
                method.to_string()
            }
            None => {
                // Android signing material is ignored for every other target.
                if let (BuildTarget::Android, Some(source)) =
                    (self.config.build_target(), &self.config.android().keystore)
                {
                    keystore = Some(editor::materialize_keystore(
                        source,
                        self.config.temporary_directory(),
                    )?);
                }

                let params = BuildScriptParams::from_config(
                    &self.config,
                    &platform::editor_output_directory(&self.config)?,
                    keystore.as_ref().map(KeystoreFile::path),
                )?;
                let script = editor::generate_build_script(&params)?;
                let path =
                    editor::write_build_script(self.config.project_directory(), &script).await?;
                runtime.log_group(
                    &format!("Generate \"{}\"", file_name(&path)),
                    &script,
                );
                editor::BUILD_SCRIPT_ENTRY_POINT.to_string()
            }
        };

        let command = editor::editor_command(&self.config, &editor_path, &execute_method);
        runtime
            .group("Run Unity", self.runner.run(&command))
            .await?;

        drop(keystore);
        Ok(())
    }

    async fn postprocess(
        &self,
        runtime: &RuntimeConfig,
        kind: PostprocessKind,
        output_path: &Path,
    ) -> Result<Option<PathBuf>> {
        match kind {
            PostprocessKind::IosExport => {
                let Some(export) = platform::ios::prepare_export(&self.config).await? else {
                    let _ = runtime
                        .warn("Team ID or provisioning profile name missing; skipping .ipa export");
                    return Ok(None);
                };
                runtime.log_group("Generate \"ExportOptions.plist\"", &export.plist);
                runtime
                    .group("Run fastlane \"gym\"", self.runner.run(&export.command))
                    .await?;
                Ok(None)
            }
            PostprocessKind::WindowsArchive => {
                platform::windows::archive_player(&self.config, output_path.to_path_buf()).await?;
                Ok(None)
            }
            PostprocessKind::MacosPackage => {
                let Some(step) = platform::macos::prepare_package(&self.config).await? else {
                    let _ = runtime.warn("No app ID configured; skipping installer package");
                    return Ok(None);
                };
                runtime.log_group("Generate \"Package.plist\"", &step.plist);
                runtime
                    .group("Run pkgbuild", self.runner.run(&step.command))
                    .await?;
                log::info!("Created installer package {}", step.package.display());
                Ok(Some(step.package))
            }
            PostprocessKind::None => Ok(None),
        }
    }

    async fn finalize(
        &self,
        output_path: PathBuf,
        package_path: Option<PathBuf>,
    ) -> Result<BuildOutcome> {
        let checksum = if tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            Some(artifact_sha256(&output_path).await?)
        } else {
            log::warn!("{} does not exist; no checksum", output_path.display());
            None
        };

        Ok(BuildOutcome {
            output_path,
            package_path,
            checksum,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
