//! Editor executable resolution.
//!
//! The editor is either given explicitly or looked up in the Unity Hub
//! install layout for the host OS. A version of `project` is read from
//! `ProjectSettings/ProjectVersion.txt`.

use crate::build::{
    Context, ErrorExt, Result,
    settings::{BuildConfiguration, EditorSettings},
};
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

static EDITOR_VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^m_EditorVersion:\s*(\S+)\s*$").expect("editor version regex is valid")
});

/// Operating system whose Hub layout is used.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HostOs {
    MacOs,
    Windows,
    Linux,
}

impl HostOs {
    /// The OS this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            HostOs::MacOs
        } else if cfg!(windows) {
            HostOs::Windows
        } else {
            HostOs::Linux
        }
    }
}

/// Path of `version` inside the default Unity Hub install root.
///
/// `home` is only consulted on Linux, where the Hub installs per user.
pub fn hub_editor_path(os: HostOs, version: &str, home: Option<&Path>) -> Result<PathBuf> {
    Ok(match os {
        HostOs::MacOs => PathBuf::from("/Applications/Unity/Hub/Editor")
            .join(version)
            .join("Unity.app/Contents/MacOS/Unity"),
        HostOs::Windows => PathBuf::from(r"C:\Program Files\Unity\Hub\Editor")
            .join(version)
            .join(r"Editor\Unity.exe"),
        HostOs::Linux => home
            .context("HOME is not set; cannot locate the Unity Hub editor")?
            .join("Unity/Hub/Editor")
            .join(version)
            .join("Editor/Unity"),
    })
}

/// Extracts `m_EditorVersion` from the contents of `ProjectVersion.txt`.
pub fn parse_project_version(contents: &str) -> Option<&str> {
    EDITOR_VERSION_LINE
        .captures(contents)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Reads the editor version the project was last saved with.
pub fn read_project_version(project_directory: &Path) -> Result<String> {
    let path = project_directory.join("ProjectSettings/ProjectVersion.txt");
    let contents = std::fs::read_to_string(&path).fs_context("reading project version", &path)?;
    parse_project_version(&contents)
        .map(str::to_string)
        .with_context(|| format!("m_EditorVersion not found in {}", path.display()))
}

/// Resolves the editor version, reading the project when asked to.
pub fn resolve_editor_version(editor: &EditorSettings, project_directory: &Path) -> Result<String> {
    if editor.uses_project_version() {
        let version = read_project_version(project_directory)?;
        log::debug!("Project requests editor {version}");
        Ok(version)
    } else {
        Ok(editor.version.clone())
    }
}

/// Resolves the editor executable for `config` on this host.
pub fn resolve_editor(config: &BuildConfiguration) -> Result<PathBuf> {
    let editor = config.editor();
    if let Some(path) = &editor.path {
        return Ok(path.clone());
    }

    let version = resolve_editor_version(editor, config.project_directory())?;
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let path = hub_editor_path(HostOs::current(), &version, home.as_deref())?;
    log::info!("Using Unity {version} at {}", path.display());
    Ok(path)
}
