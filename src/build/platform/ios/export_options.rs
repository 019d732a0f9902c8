//! ExportOptions.plist generation.

use crate::build::{
    Result,
    settings::{BuildConfiguration, ExportPolicy},
};
use handlebars::Handlebars;
use serde::Serialize;

/// ExportOptions.plist template.
///
/// The `provisioningProfiles` mapping is only emitted when both the app ID
/// and the profile name are known; otherwise xcodebuild relies on
/// automatic signing for the team.
pub const EXPORT_OPTIONS_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
  <dict>
    <key>method</key>
    <string>{{method}}</string>
    <key>teamID</key>
    <string>{{team_id}}</string>
    <key>compileBitcode</key>
    <{{compile_bitcode}}/>
{{#if provisioning}}
    <key>provisioningProfiles</key>
    <dict>
      <key>{{app_id}}</key><string>{{provisioning_profile_name}}</string>
    </dict>
{{/if}}
    <key>thinning</key>
    <string>&lt;none&gt;</string>
    <key>uploadBitcode</key>
    <{{compile_bitcode}}/>
    <key>uploadSymbols</key>
    <{{upload_symbols}}/>
    <key>stripSwiftSymbols</key>
    <{{strip_swift_symbols}}/>
  </dict>
</plist>
"#;

/// Inputs to [`generate_export_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub app_id: Option<String>,
    pub provisioning_profile_name: Option<String>,
    pub team_id: Option<String>,
    pub export_method: String,
    pub include_bitcode: bool,
    pub include_symbols: bool,
    pub strip_swift_symbols: bool,
}

impl ExportOptions {
    /// Collects export inputs from a build configuration.
    pub fn from_config(config: &BuildConfiguration) -> Self {
        let ExportPolicy {
            export_method,
            include_bitcode,
            include_symbols,
            strip_swift_symbols,
        } = config.export_policy().clone();

        Self {
            app_id: config.app_id().map(str::to_string),
            provisioning_profile_name: config.ios().provisioning_profile_name.clone(),
            team_id: config.ios().team_id.clone(),
            export_method,
            include_bitcode,
            include_symbols,
            strip_swift_symbols,
        }
    }

    /// Whether the profile mapping variant is produced.
    pub fn has_profile_mapping(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.app_id) && present(&self.provisioning_profile_name)
    }
}

#[derive(Serialize)]
struct PlistContext<'a> {
    method: &'a str,
    team_id: &'a str,
    provisioning: bool,
    app_id: &'a str,
    provisioning_profile_name: &'a str,
    compile_bitcode: bool,
    upload_symbols: bool,
    strip_swift_symbols: bool,
}

/// Escapes the five predefined XML entities.
fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Renders ExportOptions.plist for `options`.
pub fn generate_export_options(options: &ExportOptions) -> Result<String> {
    let context = PlistContext {
        method: &options.export_method,
        team_id: options.team_id.as_deref().unwrap_or_default(),
        provisioning: options.has_profile_mapping(),
        app_id: options.app_id.as_deref().unwrap_or_default(),
        provisioning_profile_name: options
            .provisioning_profile_name
            .as_deref()
            .unwrap_or_default(),
        compile_bitcode: options.include_bitcode,
        upload_symbols: options.include_symbols,
        strip_swift_symbols: options.strip_swift_symbols,
    };

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(xml_escape);
    handlebars.set_strict_mode(true);
    handlebars.register_template_string("ExportOptions.plist", EXPORT_OPTIONS_TEMPLATE)?;

    Ok(handlebars.render("ExportOptions.plist", &context)?)
}
