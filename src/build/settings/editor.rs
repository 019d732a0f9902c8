//! Editor invocation settings.

use std::path::PathBuf;

/// How the editor is located and invoked.
#[derive(Clone, Debug)]
pub struct EditorSettings {
    /// Editor version, or `"project"` to read it from
    /// `ProjectSettings/ProjectVersion.txt`.
    ///
    /// Default: "project"
    pub version: String,

    /// Explicit editor executable. Skips Hub path resolution when set.
    ///
    /// Default: None
    pub path: Option<PathBuf>,

    /// Value for `-logFile`. `-` writes the editor log to stdout.
    ///
    /// Default: "-"
    pub log_file: String,

    /// Pass `-enablePackageManagerTraces`.
    ///
    /// Default: true
    pub package_manager_traces: bool,

    /// Free-form arguments appended after everything else, in order.
    pub additional_arguments: Vec<String>,

    /// Scripting define symbols injected into the project before building.
    pub define_symbols: Vec<String>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: "project".to_string(),
            path: None,
            log_file: "-".to_string(),
            package_manager_traces: true,
            additional_arguments: Vec::new(),
            define_symbols: Vec::new(),
        }
    }
}

impl EditorSettings {
    /// Whether the version must be read from the project.
    pub fn uses_project_version(&self) -> bool {
        self.version.eq_ignore_ascii_case("project")
    }
}
