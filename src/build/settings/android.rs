//! Android signing settings.

use std::path::PathBuf;

/// Where the Android keystore comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeystoreSource {
    /// Keystore file already on disk.
    Path(PathBuf),
    /// Base64-encoded keystore contents, materialized to a temp file before
    /// the build script is generated.
    Base64(String),
}

impl std::fmt::Debug for KeystoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeystoreSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            KeystoreSource::Base64(blob) => write!(f, "Base64(<{} bytes>)", blob.len()),
        }
    }
}

/// Android signing material.
///
/// Only consulted when the build target is Android. Missing passwords are
/// not rejected here; the generated build script validates them when it runs.
#[derive(Clone, Default)]
pub struct AndroidSigning {
    /// Keystore location or contents.
    ///
    /// Default: None (debug keystore)
    pub keystore: Option<KeystoreSource>,

    /// Keystore password.
    pub keystore_password: Option<String>,

    /// Key alias name.
    pub keystore_alias: Option<String>,

    /// Key alias password.
    pub keystore_alias_password: Option<String>,
}

impl std::fmt::Debug for AndroidSigning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("AndroidSigning")
            .field("keystore", &self.keystore)
            .field("keystore_password", &redact(&self.keystore_password))
            .field("keystore_alias", &self.keystore_alias)
            .field("keystore_alias_password", &redact(&self.keystore_alias_password))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let signing = AndroidSigning {
            keystore: Some(KeystoreSource::Base64("c2VjcmV0".into())),
            keystore_password: Some("hunter2".into()),
            keystore_alias: Some("upload".into()),
            keystore_alias_password: Some("hunter3".into()),
        };
        let rendered = format!("{signing:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("c2VjcmV0"));
        assert!(rendered.contains("upload"));
    }
}
