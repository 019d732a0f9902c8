//! iOS signing and export policy settings.

/// iOS code signing material.
///
/// Only consulted when the build target is iOS.
#[derive(Clone, Debug, Default)]
pub struct IosSigning {
    /// Apple developer team identifier.
    ///
    /// Default: None (automatic signing is left untouched)
    pub team_id: Option<String>,

    /// UUID of the manual provisioning profile.
    pub provisioning_profile_uuid: Option<String>,

    /// Provisioning profile name, used as the ExportOptions profile mapping.
    ///
    /// The export step only runs when both this and `team_id` are set.
    pub provisioning_profile_name: Option<String>,

    /// Provisioning profile type (`development`, `distribution`, `automatic`).
    pub provisioning_profile_type: Option<String>,
}

impl IosSigning {
    /// Whether enough material is present to export an .ipa.
    pub fn can_export(&self) -> bool {
        self.team_id.is_some() && self.provisioning_profile_name.is_some()
    }
}

/// Xcode export policy written to ExportOptions.plist and passed to gym.
#[derive(Clone, Debug)]
pub struct ExportPolicy {
    /// Export method (`app-store`, `ad-hoc`, `enterprise`, `development`).
    ///
    /// Default: "app-store"
    pub export_method: String,

    /// Compile and upload bitcode.
    ///
    /// Default: false
    pub include_bitcode: bool,

    /// Upload debug symbols.
    ///
    /// Default: true
    pub include_symbols: bool,

    /// Strip Swift symbols from the exported binary.
    ///
    /// Default: true
    pub strip_swift_symbols: bool,
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self {
            export_method: "app-store".to_string(),
            include_bitcode: false,
            include_symbols: true,
            strip_swift_symbols: true,
        }
    }
}
