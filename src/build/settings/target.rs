//! Build target and build configuration identifiers.

use crate::build::Error;
use std::{fmt, str::FromStr};

/// Platform the editor compiles the player for.
///
/// Variants mirror the editor's `-buildTarget` names. Targets the editor
/// knows about but this action cannot package (e.g. [`BuildTarget::WebGL`])
/// still parse, so the platform resolver can reject them with
/// [`Error::UnsupportedPlatform`].
///
/// ```
/// use unity_build_action::build::BuildTarget;
///
/// let target: BuildTarget = "win64".parse().unwrap();
/// assert_eq!(target, BuildTarget::Win64);
/// assert_eq!(target.as_str(), "Win64");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BuildTarget {
    /// iOS (Xcode project, exported to .ipa)
    Ios,
    /// Android (app bundle)
    Android,
    /// Windows 32-bit standalone
    Win,
    /// Windows 64-bit standalone
    Win64,
    /// macOS universal standalone (.app)
    OsxUniversal,
    /// Linux 64-bit standalone
    Linux64,
    /// Nintendo Switch
    Switch,
    /// WebGL
    WebGL,
    /// Apple TV
    TvOs,
    /// PlayStation 4
    Ps4,
    /// PlayStation 5
    Ps5,
    /// Xbox One
    XboxOne,
}

impl BuildTarget {
    const ALL: [BuildTarget; 12] = [
        BuildTarget::Ios,
        BuildTarget::Android,
        BuildTarget::Win,
        BuildTarget::Win64,
        BuildTarget::OsxUniversal,
        BuildTarget::Linux64,
        BuildTarget::Switch,
        BuildTarget::WebGL,
        BuildTarget::TvOs,
        BuildTarget::Ps4,
        BuildTarget::Ps5,
        BuildTarget::XboxOne,
    ];

    /// Name passed to the editor's `-buildTarget` flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildTarget::Ios => "iOS",
            BuildTarget::Android => "Android",
            BuildTarget::Win => "Win",
            BuildTarget::Win64 => "Win64",
            BuildTarget::OsxUniversal => "OSXUniversal",
            BuildTarget::Linux64 => "Linux64",
            BuildTarget::Switch => "Switch",
            BuildTarget::WebGL => "WebGL",
            BuildTarget::TvOs => "tvOS",
            BuildTarget::Ps4 => "PS4",
            BuildTarget::Ps5 => "PS5",
            BuildTarget::XboxOne => "XboxOne",
        }
    }

    /// Member of the editor scripting API's `BuildTarget` enum.
    pub fn editor_enum(&self) -> &'static str {
        match self {
            BuildTarget::Ios => "iOS",
            BuildTarget::Android => "Android",
            BuildTarget::Win => "StandaloneWindows",
            BuildTarget::Win64 => "StandaloneWindows64",
            BuildTarget::OsxUniversal => "StandaloneOSX",
            BuildTarget::Linux64 => "StandaloneLinux64",
            BuildTarget::Switch => "Switch",
            BuildTarget::WebGL => "WebGL",
            BuildTarget::TvOs => "tvOS",
            BuildTarget::Ps4 => "PS4",
            BuildTarget::Ps5 => "PS5",
            BuildTarget::XboxOne => "XboxOne",
        }
    }

    /// Platform group key used under `scriptingDefineSymbols` in
    /// `ProjectSettings.asset`.
    pub fn define_group(&self) -> &'static str {
        match self {
            BuildTarget::Ios => "iPhone",
            BuildTarget::Android => "Android",
            BuildTarget::Win
            | BuildTarget::Win64
            | BuildTarget::OsxUniversal
            | BuildTarget::Linux64 => "Standalone",
            BuildTarget::Switch => "Switch",
            BuildTarget::WebGL => "WebGL",
            BuildTarget::TvOs => "tvOS",
            BuildTarget::Ps4 => "PS4",
            BuildTarget::Ps5 => "PS5",
            BuildTarget::XboxOne => "XboxOne",
        }
    }
}

impl FromStr for BuildTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BuildTarget::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnsupportedPlatform {
                target: wanted.to_string(),
            })
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build configuration, also used as the Xcode configuration for iOS exports.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Configuration {
    /// Development build
    Debug,
    /// Shipping build
    #[default]
    Release,
}

impl Configuration {
    /// Name as accepted by Xcode / fastlane.
    pub fn as_str(&self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::Release => "Release",
        }
    }

    /// Whether the player is built with `BuildOptions.Development`.
    pub fn is_development(&self) -> bool {
        matches!(self, Configuration::Debug)
    }
}

impl FromStr for Configuration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Configuration::Debug),
            "release" => Ok(Configuration::Release),
            other => Err(Error::GenericError(format!(
                "Invalid configuration: {other}. Valid configurations: Debug, Release"
            ))),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
