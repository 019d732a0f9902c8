//! Unity editor integration.
//!
//! Locates the editor, prepares the project (define symbols, keystore, build
//! script) and assembles the batch-mode command line.

mod defines;
mod executable;
mod keystore;
mod script;
mod template;

pub use defines::{apply_define_symbols, inject_define_symbols, project_settings_path};
pub use executable::{
    HostOs, hub_editor_path, parse_project_version, read_project_version, resolve_editor,
    resolve_editor_version,
};
pub use keystore::{KeystoreFile, materialize_keystore};
pub use script::{BuildScriptParams, generate_build_script};
pub use template::{
    BUILD_SCRIPT_CLASS, BUILD_SCRIPT_ENTRY_POINT, BUILD_SCRIPT_TEMPLATE,
    BUILD_SCRIPT_TEMPLATE_VERSION,
};

use crate::build::{ArgumentBuilder, CommandLine, ErrorExt, Result, settings::BuildConfiguration};
use std::path::{Path, PathBuf};

/// Where the generated script is written inside the project.
pub fn build_script_path(project_directory: &Path) -> PathBuf {
    project_directory
        .join("Assets/Editor")
        .join(format!("{BUILD_SCRIPT_CLASS}.cs"))
}

/// Writes `script` into the project, creating `Assets/Editor` if needed.
pub async fn write_build_script(project_directory: &Path, script: &str) -> Result<PathBuf> {
    let path = build_script_path(project_directory);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating editor script directory", parent)?;
    }
    tokio::fs::write(&path, script)
        .await
        .fs_context("writing build script", &path)?;
    Ok(path)
}

/// Batch-mode editor invocation for `config`.
///
/// `execute_method` is the static method the editor runs after loading the
/// project. Additional arguments always come last, in order.
pub fn editor_command(
    config: &BuildConfiguration,
    editor: &Path,
    execute_method: &str,
) -> CommandLine {
    let settings = config.editor();

    let mut args = ArgumentBuilder::new()
        .append("-quit")
        .append("-batchmode")
        .append("-nographics")
        .append("-silent-crashes")
        .append_value("-buildTarget", config.build_target().as_str())
        .append_path("-projectPath", config.project_directory())
        .append_value("-logFile", &settings.log_file);

    if settings.package_manager_traces {
        args = args.append("-enablePackageManagerTraces");
    }

    args.append_value("-executeMethod", execute_method)
        .extend(settings.additional_arguments.iter().cloned())
        .into_command(editor)
}
