//! Windows player archiving.
//!
//! The editor writes the player (`<name>.exe`, `<name>_Data/`, the
//! runtime DLLs) into a staging directory of its own under the temporary
//! directory; that tree alone is shipped as a single zip in the output
//! directory.

use crate::build::{Error, ErrorExt, Result, settings::BuildConfiguration};
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Zips every file under `source` into `archive`, with paths relative to
/// `source`. `archive` itself is skipped if it lies inside `source`.
pub fn create_archive(source: &Path, archive: &Path) -> Result<u64> {
    if !source.is_dir() {
        crate::bail!("{} is not a directory", source.display());
    }
    if let Some(parent) = archive.parent() {
        std::fs::create_dir_all(parent).fs_context("creating archive directory", parent)?;
    }

    let file = File::create(archive).fs_context("creating archive", archive)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);

    let mut files = 0;
    for entry in WalkDir::new(source).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path == archive {
            continue;
        }

        let relative = path.strip_prefix(source)?;
        if relative.as_os_str().is_empty() {
            continue;
        }
        // Zip entries always use forward slashes.
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
        } else {
            zip.start_file(name, options)?;
            let mut input = File::open(path).fs_context("reading player file", path)?;
            io::copy(&mut input, &mut zip)?;
            files += 1;
        }
    }

    zip.finish()?;
    Ok(files)
}

/// `<temporary_directory>/<output_name>-player`.
pub fn staging_directory(config: &BuildConfiguration) -> PathBuf {
    config
        .temporary_directory()
        .join(format!("{}-player", config.output_name()))
}

/// Empties the staging directory so only this run's player gets archived.
pub async fn prepare_staging(config: &BuildConfiguration) -> Result<PathBuf> {
    let staging = staging_directory(config);
    if tokio::fs::try_exists(&staging).await.unwrap_or(false) {
        log::debug!("Removing stale player files in {}", staging.display());
        tokio::fs::remove_dir_all(&staging)
            .await
            .fs_context("clearing staging directory", &staging)?;
    }
    tokio::fs::create_dir_all(&staging)
        .await
        .fs_context("creating staging directory", &staging)?;
    Ok(staging)
}

/// Archives the staging directory into `<output_directory>/<name>.zip`.
pub async fn archive_player(config: &BuildConfiguration, output_path: PathBuf) -> Result<PathBuf> {
    let source = staging_directory(config);
    let archive = output_path.clone();

    let files = tokio::task::spawn_blocking(move || create_archive(&source, &archive))
        .await
        .map_err(|e| Error::GenericError(format!("Archive task panicked: {e}")))??;

    log::info!("Archived {files} files into {}", output_path.display());
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn player(dir: &Path) {
        std::fs::create_dir_all(dir.join("Game_Data/Managed")).unwrap();
        std::fs::write(dir.join("Game.exe"), b"MZ").unwrap();
        std::fs::write(dir.join("Game_Data/Managed/Assembly-CSharp.dll"), b"dll").unwrap();
    }

    #[test]
    fn archives_tree_with_relative_names() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        player(src.path());

        let archive = out.path().join("Game.zip");
        assert_eq!(create_archive(src.path(), &archive).unwrap(), 2);

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mut exe = String::new();
        zip.by_name("Game.exe").unwrap().read_to_string(&mut exe).unwrap();
        assert_eq!(exe, "MZ");
        assert!(zip.by_name("Game_Data/Managed/Assembly-CSharp.dll").is_ok());
    }

    #[test]
    fn archive_inside_source_is_skipped() {
        let src = TempDir::new().unwrap();
        player(src.path());

        let archive = src.path().join("Game.zip");
        assert_eq!(create_archive(src.path(), &archive).unwrap(), 2);
        let zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        assert!(zip.file_names().all(|n| n != "Game.zip"));
    }

    #[test]
    fn missing_source_fails() {
        let out = TempDir::new().unwrap();
        let source = out.path().join("missing");
        assert!(create_archive(&source, &out.path().join("Game.zip")).is_err());
    }

    #[tokio::test]
    async fn staging_is_emptied_and_archived_alone() {
        let tmp = TempDir::new().unwrap();
        let config = crate::build::SettingsBuilder::new()
            .build_target(crate::build::BuildTarget::Win64)
            .project_directory("/src/Game")
            .output_directory(tmp.path().join("out"))
            .temporary_directory(tmp.path())
            .output_name("Game")
            .build()
            .unwrap();

        // Leftovers from earlier jobs sharing the temporary directory.
        std::fs::write(tmp.path().join("ExportOptions.plist"), b"<plist/>").unwrap();
        std::fs::create_dir_all(tmp.path().join("Game-player")).unwrap();
        std::fs::write(tmp.path().join("Game-player/old.dll"), b"old").unwrap();

        let staging = prepare_staging(&config).await.unwrap();
        assert_eq!(staging, tmp.path().join("Game-player"));
        assert_eq!(std::fs::read_dir(&staging).unwrap().count(), 0);
        player(&staging);

        let archive = archive_player(&config, tmp.path().join("out/Game.zip"))
            .await
            .unwrap();
        let zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mut names: Vec<_> = zip.file_names().collect();
        names.sort();
        assert_eq!(
            names,
            [
                "Game.exe",
                "Game_Data/",
                "Game_Data/Managed/",
                "Game_Data/Managed/Assembly-CSharp.dll"
            ]
        );
    }
}
