//! Component property list for `pkgbuild --component-plist`.

use crate::build::Result;
use handlebars::Handlebars;
use std::collections::BTreeMap;

const PACKAGE_PLIST_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<array>
  <dict>
    <key>BundleHasStrictIdentifier</key>
    <{{strict_identifier}}/>
    <key>BundleIsRelocatable</key>
    <{{relocatable}}/>
    <key>BundleIsVersionChecked</key>
    <{{version_checked}}/>
    <key>BundleOverwriteAction</key>
    <string>{{overwrite_action}}</string>
    <key>RootRelativeBundlePath</key>
    <string>{{root_relative_bundle_path}}</string>
    <key>BundlePostInstallScriptPath</key>
    <string>{{post_install_script}}</string>
    <key>BundlePreInstallScriptPath</key>
    <string>{{pre_install_script}}</string>
  </dict>
</array>
</plist>
"#;

/// One component bundle in the installer package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageComponent {
    /// Bundle path relative to `--root`, e.g. `Game.app`.
    pub root_relative_bundle_path: String,
    /// Refuse to install over a bundle with a different identifier.
    pub strict_identifier: bool,
    /// Follow the bundle if the user moved it.
    pub relocatable: bool,
    /// Refuse to downgrade a newer on-disk version.
    pub version_checked: bool,
    /// `true` upgrades the existing bundle, `false` updates it in place.
    pub overwrite: bool,
    pub post_install_script: String,
    pub pre_install_script: String,
}

impl PackageComponent {
    pub fn new(root_relative_bundle_path: impl Into<String>) -> Self {
        Self {
            root_relative_bundle_path: root_relative_bundle_path.into(),
            strict_identifier: true,
            relocatable: false,
            version_checked: true,
            overwrite: true,
            post_install_script: String::new(),
            pre_install_script: String::new(),
        }
    }

    /// `BundleOverwriteAction` value.
    pub fn overwrite_action(&self) -> &'static str {
        if self.overwrite { "upgrade" } else { "update" }
    }
}

pub fn generate_package_plist(component: &PackageComponent) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::html_escape);

    let flag = |b: bool| if b { "true" } else { "false" }.to_string();

    let mut data = BTreeMap::new();
    data.insert("strict_identifier", flag(component.strict_identifier));
    data.insert("relocatable", flag(component.relocatable));
    data.insert("version_checked", flag(component.version_checked));
    data.insert("overwrite_action", component.overwrite_action().to_string());
    data.insert(
        "root_relative_bundle_path",
        component.root_relative_bundle_path.clone(),
    );
    data.insert("post_install_script", component.post_install_script.clone());
    data.insert("pre_install_script", component.pre_install_script.clone());

    Ok(handlebars.render_template(PACKAGE_PLIST_TEMPLATE, &data)?)
}
