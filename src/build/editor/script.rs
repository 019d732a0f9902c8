//! Build script generation.
//!
//! Renders [`BUILD_SCRIPT_TEMPLATE`] from a typed parameter struct using
//! Handlebars. Generation is a pure function of its parameters: signing
//! problems are left for the generated script to report when the editor runs
//! it.

use super::template::{BUILD_SCRIPT_TEMPLATE, BUILD_SCRIPT_TEMPLATE_VERSION};
use crate::build::{
    Result,
    platform::output_extension,
    settings::{BuildConfiguration, BuildTarget},
};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

/// Inputs to the build script.
///
/// Fields irrelevant to `build_target` are still embedded so they are
/// visible in the generated file, but only the active target's configure
/// step reads them. `None` renders as an empty string, which the script
/// treats as "skip this signing step".
#[derive(Debug, Clone, PartialEq)]
pub struct BuildScriptParams {
    /// Target the script builds.
    pub build_target: BuildTarget,
    /// Directory handed to `BuildPlayerOptions.locationPathName`.
    pub output_directory: String,
    /// Player file name inside `output_directory` (empty for Xcode projects).
    pub output_file_name: String,
    /// Build counter.
    pub revision: u32,
    /// `PlayerSettings.bundleVersion`.
    pub bundle_version: Option<String>,
    /// Application identifier for the active target group.
    pub app_id: Option<String>,
    /// Build with `BuildOptions.Development`.
    pub development: bool,
    /// Apple developer team.
    pub team_id: Option<String>,
    /// Manual provisioning profile UUID.
    pub provisioning_profile_uuid: Option<String>,
    /// Manual provisioning profile type.
    pub provisioning_profile_type: Option<String>,
    /// Keystore file path; base64 keystores must already be materialized.
    pub keystore: Option<String>,
    /// Keystore password.
    pub keystore_password: Option<String>,
    /// Key alias.
    pub keystore_alias: Option<String>,
    /// Key alias password.
    pub keystore_alias_password: Option<String>,
}

impl BuildScriptParams {
    /// Selects script parameters from `config`.
    ///
    /// `output_directory` is where the editor writes the player and
    /// `keystore` the on-disk keystore, if any.
    pub fn from_config(
        config: &BuildConfiguration,
        output_directory: &Path,
        keystore: Option<&Path>,
    ) -> Result<Self> {
        let target = config.build_target();
        let ios = config.ios();
        let android = config.android();

        Ok(Self {
            build_target: target,
            output_directory: output_directory.display().to_string(),
            output_file_name: player_file_name(config)?,
            revision: config.revision(),
            bundle_version: config.bundle_version().map(str::to_string),
            app_id: config.app_id().map(str::to_string),
            development: config.configuration().is_development(),
            team_id: ios.team_id.clone(),
            provisioning_profile_uuid: ios.provisioning_profile_uuid.clone(),
            provisioning_profile_type: ios.provisioning_profile_type.clone(),
            keystore: keystore.map(|p| p.display().to_string()),
            keystore_password: android.keystore_password.clone(),
            keystore_alias: android.keystore_alias.clone(),
            keystore_alias_password: android.keystore_alias_password.clone(),
        })
    }
}

/// File name the editor writes for `config`'s target.
///
/// iOS builds produce an Xcode project directory, so the name is empty and
/// the player lands directly in the output directory.
fn player_file_name(config: &BuildConfiguration) -> Result<String> {
    let name = config.output_name();
    Ok(match config.build_target() {
        BuildTarget::Ios => String::new(),
        BuildTarget::Win | BuildTarget::Win64 => format!("{name}.exe"),
        target => format!(
            "{name}{}",
            output_extension(target, config.configuration())?
        ),
    })
}

/// Escapes a value for a regular `"..."` C# string literal.
fn quote_regular(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// Escapes a value for a verbatim `@"..."` C# string literal.
fn quote_verbatim(value: &str) -> String {
    value.replace('"', "\"\"")
}

/// Upper-cases the first letter and lower-cases the rest
/// (`development` -> `Development`).
fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[derive(Serialize)]
struct ScriptContext<'a> {
    template_version: &'a str,
    build_target: &'a str,
    output_directory: String,
    output_file_name: String,
    revision: u32,
    bundle_version: String,
    app_id: String,
    development: bool,
    team_id: String,
    provisioning_profile_uuid: String,
    provisioning_profile_type: String,
    keystore: String,
    keystore_password: String,
    keystore_alias: String,
    keystore_alias_password: String,
}

/// Renders the build script for `params`.
///
/// Deterministic: identical parameters always produce identical text.
pub fn generate_build_script(params: &BuildScriptParams) -> Result<String> {
    let regular = |v: &Option<String>| v.as_deref().map(quote_regular).unwrap_or_default();

    let context = ScriptContext {
        template_version: BUILD_SCRIPT_TEMPLATE_VERSION,
        build_target: params.build_target.editor_enum(),
        output_directory: quote_verbatim(&params.output_directory),
        output_file_name: quote_verbatim(&params.output_file_name),
        revision: params.revision,
        bundle_version: regular(&params.bundle_version),
        app_id: regular(&params.app_id),
        development: params.development,
        team_id: regular(&params.team_id),
        provisioning_profile_uuid: regular(&params.provisioning_profile_uuid),
        provisioning_profile_type: params
            .provisioning_profile_type
            .as_deref()
            .map(|t| quote_regular(&title_case(t)))
            .unwrap_or_default(),
        keystore: params
            .keystore
            .as_deref()
            .map(quote_verbatim)
            .unwrap_or_default(),
        keystore_password: regular(&params.keystore_password),
        keystore_alias: regular(&params.keystore_alias),
        keystore_alias_password: regular(&params.keystore_alias_password),
    };

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);
    handlebars.register_template_string("UnityBuildScript.cs", BUILD_SCRIPT_TEMPLATE)?;

    Ok(handlebars.render("UnityBuildScript.cs", &context)?)
}
