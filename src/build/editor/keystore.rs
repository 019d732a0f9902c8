//! Android keystore materialization.

use crate::build::{ErrorExt, Result, settings::KeystoreSource};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::TempPath;

/// Keystore available on disk for the editor to read.
///
/// A decoded base64 keystore lives in a temporary file that is removed when
/// this value is dropped, so it must outlive the editor invocation.
#[derive(Debug)]
pub enum KeystoreFile {
    /// User-supplied file, left untouched.
    Existing(PathBuf),
    /// Decoded blob in a temporary file.
    Decoded(TempPath),
}

impl KeystoreFile {
    /// Path handed to the build script.
    pub fn path(&self) -> &Path {
        match self {
            KeystoreFile::Existing(path) => path.as_path(),
            KeystoreFile::Decoded(path) => &**path,
        }
    }
}

/// Makes `source` available as a file, decoding base64 into `directory`.
pub fn materialize_keystore(source: &KeystoreSource, directory: &Path) -> Result<KeystoreFile> {
    match source {
        KeystoreSource::Path(path) => Ok(KeystoreFile::Existing(path.clone())),
        KeystoreSource::Base64(blob) => {
            let compact: String = blob.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = STANDARD.decode(compact)?;

            let mut file = tempfile::Builder::new()
                .prefix("upload-")
                .suffix(".keystore")
                .tempfile_in(directory)
                .fs_context("creating keystore file", directory)?;
            file.write_all(&bytes)
                .fs_context("writing keystore file", file.path())?;

            log::debug!(
                "Decoded {} byte keystore to {}",
                bytes.len(),
                file.path().display()
            );
            Ok(KeystoreFile::Decoded(file.into_temp_path()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn path_source_is_used_as_is() {
        let dir = TempDir::new().unwrap();
        let source = KeystoreSource::Path("/keys/upload.keystore".into());
        let file = materialize_keystore(&source, dir.path()).unwrap();
        assert_eq!(file.path(), Path::new("/keys/upload.keystore"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn base64_is_decoded_to_temporary_file() {
        let dir = TempDir::new().unwrap();
        let encoded = STANDARD.encode(b"\xfe\xed\xfe\xedkeystore");
        // CI secrets are often pasted with line breaks.
        let wrapped = format!("{}\n{}", &encoded[..8], &encoded[8..]);

        let file = materialize_keystore(&KeystoreSource::Base64(wrapped), dir.path()).unwrap();
        let path = file.path().to_path_buf();
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("keystore"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\xfe\xed\xfe\xedkeystore");

        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = materialize_keystore(&KeystoreSource::Base64("not base64!".into()), dir.path())
            .unwrap_err();
        assert!(matches!(err, crate::build::Error::Base64(_)));
    }
}
