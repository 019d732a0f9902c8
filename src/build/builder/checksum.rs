//! SHA-256 checksums for build artifacts.
//!
//! Files are hashed by content. Directory artifacts (`.app` bundles, Switch
//! or Linux player folders) are hashed as a tree: every regular file's
//! relative path followed by its content, in sorted path order.

use crate::{
    bail,
    build::{Error, ErrorExt, Result},
};
use sha2::{Digest, Sha256};
use std::{
    io::Read,
    path::{Path, PathBuf},
};
use tokio::io::AsyncReadExt;

const CHUNK: usize = 8192;

/// Hex-encoded SHA-256 of a file or directory tree.
pub async fn artifact_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("inspecting artifact", path)?;

    if metadata.is_file() {
        file_sha256(path).await
    } else if metadata.is_dir() {
        let root = path.to_path_buf();
        tokio::task::spawn_blocking(move || tree_sha256(&root))
            .await
            .map_err(|e| Error::GenericError(format!("Checksum task panicked: {e}")))?
    } else {
        bail!("{} is neither a file nor a directory", path.display())
    }
}

async fn file_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening artifact", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading artifact", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn tree_sha256(root: &Path) -> Result<String> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK];
    for path in files {
        // Forward slashes keep the digest identical across hosts.
        let relative = path.strip_prefix(root)?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        hasher.update(name.as_bytes());

        let mut file = std::fs::File::open(&path).fs_context("opening artifact file", &path)?;
        loop {
            let n = file
                .read(&mut buffer)
                .fs_context("reading artifact file", &path)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}
