//! End-to-end pipeline tests with a recording process runner.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::TempDir;
use unity_build_action::{
    build::{
        AndroidSigning, BuildTarget, Builder, CommandLine, CommandRunner, EditorSettings, Error,
        IosSigning, KeystoreSource, Result, SettingsBuilder,
    },
    cli::{OutputManager, RuntimeConfig},
};

/// Records every command and optionally fails the one with a given name.
#[derive(Default)]
struct RecordingRunner {
    commands: Mutex<Vec<CommandLine>>,
    fail: Option<&'static str>,
    /// File whose contents are captured at the moment a command runs.
    snoop: Option<PathBuf>,
    snooped: Mutex<Option<Vec<u8>>>,
    /// Directory a fake Windows player is written into when the editor runs.
    player: Option<PathBuf>,
}

impl RecordingRunner {
    fn failing(name: &'static str) -> Self {
        Self {
            fail: Some(name),
            ..Default::default()
        }
    }

    fn commands(&self) -> Vec<CommandLine> {
        self.commands.lock().unwrap().clone()
    }

    fn names(&self) -> Vec<String> {
        self.commands().iter().map(CommandLine::name).collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandLine) -> Result<()> {
        self.commands.lock().unwrap().push(command.clone());
        if let Some(path) = &self.snoop {
            *self.snooped.lock().unwrap() = std::fs::read(path).ok();
        }
        if let (Some(dir), "Unity") = (&self.player, command.name().as_str()) {
            std::fs::create_dir_all(dir.join("Game_Data")).unwrap();
            std::fs::write(dir.join("Game.exe"), b"MZ").unwrap();
            std::fs::write(dir.join("Game_Data/globalgamemanagers"), b"data").unwrap();
        }
        match self.fail {
            Some(name) if command.name() == name => Err(Error::ProcessFailed {
                command: command.name(),
                exit_code: Some(1),
                message: "Scripts have compiler errors.".into(),
            }),
            _ => Ok(()),
        }
    }
}

struct Workspace {
    _root: TempDir,
    project: PathBuf,
    out: PathBuf,
    tmp: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let project = root.path().join("Game");
        std::fs::create_dir_all(project.join("ProjectSettings")).unwrap();
        Self {
            project,
            out: root.path().join("out"),
            tmp: root.path().join("tmp"),
            _root: root,
        }
    }

    fn settings(&self, target: BuildTarget) -> SettingsBuilder {
        SettingsBuilder::new()
            .build_target(target)
            .project_directory(&self.project)
            .output_directory(&self.out)
            .temporary_directory(&self.tmp)
            .output_name("Game")
            .editor(EditorSettings {
                path: Some("/opt/unity/Editor/Unity".into()),
                ..Default::default()
            })
    }

    fn script(&self) -> PathBuf {
        self.project.join("Assets/Editor/UnityBuildScript.cs")
    }
}

fn runtime() -> RuntimeConfig {
    RuntimeConfig::new(OutputManager::new(true))
}

fn arg_after<'a>(command: &'a CommandLine, flag: &str) -> Option<&'a str> {
    command
        .args
        .iter()
        .position(|a| a == flag)
        .and_then(|i| command.args.get(i + 1))
        .map(String::as_str)
}

#[tokio::test]
async fn ios_without_signing_skips_export() {
    let ws = Workspace::new();
    let config = ws
        .settings(BuildTarget::Ios)
        .ios_signing(IosSigning {
            team_id: Some("ABCDE12345".into()),
            provisioning_profile_name: Some(String::new()),
            ..Default::default()
        })
        .build()
        .unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::default());
    let outcome = builder.run(&runtime()).await.unwrap();

    assert_eq!(builder.runner().names(), ["Unity"]);
    assert!(!ws.tmp.join("ExportOptions.plist").exists());
    assert_eq!(outcome.output_path, ws.out.join("Game.ipa"));
    assert_eq!(outcome.checksum, None);

    let script = std::fs::read_to_string(ws.script()).unwrap();
    assert!(script.contains(&format!("OutputDirectory = @\"{}\";", ws.tmp.display())));
}

#[tokio::test]
async fn ios_export_prefers_workspace() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.tmp.join("Unity-iPhone.xcworkspace")).unwrap();
    let config = ws
        .settings(BuildTarget::Ios)
        .app_id("com.example.game")
        .ios_signing(IosSigning {
            team_id: Some("ABCDE12345".into()),
            provisioning_profile_name: Some("Game Distribution".into()),
            ..Default::default()
        })
        .build()
        .unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::default());
    builder.run(&runtime()).await.unwrap();

    let commands = builder.runner().commands();
    assert_eq!(builder.runner().names(), ["Unity", "fastlane"]);
    let gym = &commands[1];
    assert_eq!(gym.args[0], "gym");
    assert_eq!(
        arg_after(gym, "--workspace"),
        Some(ws.tmp.join("Unity-iPhone.xcworkspace").to_str().unwrap())
    );
    assert_eq!(arg_after(gym, "--project"), None);

    let plist = std::fs::read_to_string(ws.tmp.join("ExportOptions.plist")).unwrap();
    assert!(plist.contains("<key>com.example.game</key><string>Game Distribution</string>"));
}

#[tokio::test]
async fn ios_export_falls_back_to_project() {
    let ws = Workspace::new();
    let config = ws
        .settings(BuildTarget::Ios)
        .ios_signing(IosSigning {
            team_id: Some("ABCDE12345".into()),
            provisioning_profile_name: Some("Game Distribution".into()),
            ..Default::default()
        })
        .build()
        .unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::default());
    builder.run(&runtime()).await.unwrap();

    let gym = &builder.runner().commands()[1];
    assert_eq!(
        arg_after(gym, "--project"),
        Some(ws.tmp.join("Unity-iPhone.xcodeproj").to_str().unwrap())
    );
    let plist = std::fs::read_to_string(ws.tmp.join("ExportOptions.plist")).unwrap();
    assert!(!plist.contains("provisioningProfiles"));
}

#[tokio::test]
async fn editor_failure_skips_postprocess_and_surfaces_message() {
    let ws = Workspace::new();
    let config = ws
        .settings(BuildTarget::Ios)
        .ios_signing(IosSigning {
            team_id: Some("ABCDE12345".into()),
            provisioning_profile_name: Some("Game Distribution".into()),
            ..Default::default()
        })
        .build()
        .unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::failing("Unity"));
    let err = builder.run(&runtime()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Unity exited with code 1: Scripts have compiler errors."
    );
    assert_eq!(builder.runner().names(), ["Unity"]);
    assert!(!ws.tmp.join("ExportOptions.plist").exists());
}

#[tokio::test]
async fn win64_player_is_zipped_into_output() {
    let ws = Workspace::new();
    let staging = ws.tmp.join("Game-player");

    let config = ws.settings(BuildTarget::Win64).build().unwrap();
    let runner = RecordingRunner {
        player: Some(staging.clone()),
        ..Default::default()
    };
    let builder = Builder::with_runner(config, runner);
    let outcome = builder.run(&runtime()).await.unwrap();

    assert_eq!(outcome.output_path, ws.out.join("Game.zip"));
    assert!(outcome.output_path.is_file());
    assert_eq!(outcome.checksum.as_deref().map(str::len), Some(64));

    let script = std::fs::read_to_string(ws.script()).unwrap();
    assert!(script.contains(&format!("OutputDirectory = @\"{}\";", staging.display())));

    let archive = zip::ZipArchive::new(std::fs::File::open(&outcome.output_path).unwrap()).unwrap();
    let mut names: Vec<_> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, ["Game.exe", "Game_Data/", "Game_Data/globalgamemanagers"]);
}

#[tokio::test]
async fn win64_archive_excludes_other_jobs_leftovers() {
    let ws = Workspace::new();
    let staging = ws.tmp.join("Game-player");
    // A previous iOS job and a previous Windows build on the same runner.
    std::fs::create_dir_all(ws.tmp.join("Unity-iPhone.xcodeproj")).unwrap();
    std::fs::write(ws.tmp.join("ExportOptions.plist"), b"<plist/>").unwrap();
    std::fs::create_dir_all(&staging).unwrap();
    std::fs::write(staging.join("RemovedPlugin.dll"), b"old").unwrap();

    let config = ws.settings(BuildTarget::Win64).build().unwrap();
    let runner = RecordingRunner {
        player: Some(staging),
        ..Default::default()
    };
    let outcome = Builder::with_runner(config, runner)
        .run(&runtime())
        .await
        .unwrap();

    let archive = zip::ZipArchive::new(std::fs::File::open(&outcome.output_path).unwrap()).unwrap();
    let names: Vec<_> = archive.file_names().collect();
    assert!(!names.iter().any(|n| n.contains("ExportOptions")), "{names:?}");
    assert!(!names.iter().any(|n| n.contains("xcodeproj")), "{names:?}");
    assert!(!names.contains(&"RemovedPlugin.dll"), "{names:?}");
    assert!(names.contains(&"Game.exe"));
}

#[tokio::test]
async fn execute_method_override_skips_script_generation() {
    let ws = Workspace::new();
    let config = ws
        .settings(BuildTarget::Android)
        .execute_method("Studio.CI.Build")
        .editor(EditorSettings {
            path: Some("/opt/unity/Editor/Unity".into()),
            additional_arguments: vec!["-stackTraceLogType".into(), "Full".into()],
            ..Default::default()
        })
        .build()
        .unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::default());
    builder.run(&runtime()).await.unwrap();

    let editor = &builder.runner().commands()[0];
    assert_eq!(editor.program, Path::new("/opt/unity/Editor/Unity"));
    assert_eq!(arg_after(editor, "-executeMethod"), Some("Studio.CI.Build"));
    assert_eq!(
        &editor.args[editor.args.len() - 2..],
        ["-stackTraceLogType", "Full"]
    );
    assert!(!ws.script().exists());
}

#[tokio::test]
async fn generated_script_is_the_default_entry_point() {
    let ws = Workspace::new();
    let config = ws.settings(BuildTarget::Linux64).revision(9).build().unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::default());
    let outcome = builder.run(&runtime()).await.unwrap();

    let editor = &builder.runner().commands()[0];
    assert_eq!(
        arg_after(editor, "-executeMethod"),
        Some("UnityBuildScript.PerformBuild")
    );
    assert_eq!(arg_after(editor, "-buildTarget"), Some("Linux64"));

    let script = std::fs::read_to_string(ws.script()).unwrap();
    assert!(script.contains("BuildTarget.StandaloneLinux64;"));
    assert!(script.contains("OutputFileName = @\"Game.x86_64\";"));
    assert!(script.contains("Revision = 9;"));
    assert_eq!(outcome.output_path, ws.out.join("Game.x86_64"));
}

#[tokio::test]
async fn macos_packages_app_when_app_id_is_set() {
    let ws = Workspace::new();
    let config = ws
        .settings(BuildTarget::OsxUniversal)
        .app_id("com.example.game")
        .bundle_version("1.4.0")
        .build()
        .unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::default());
    let outcome = builder.run(&runtime()).await.unwrap();

    assert_eq!(builder.runner().names(), ["Unity", "pkgbuild"]);
    let pkgbuild = &builder.runner().commands()[1];
    assert_eq!(arg_after(pkgbuild, "--identifier"), Some("com.example.game"));
    assert_eq!(arg_after(pkgbuild, "--version"), Some("1.4.0"));
    assert_eq!(outcome.output_path, ws.out.join("Game.app"));
    assert_eq!(outcome.package_path, Some(ws.tmp.join("Game.pkg")));

    let plist = std::fs::read_to_string(ws.tmp.join("Package.plist")).unwrap();
    assert!(plist.contains("<string>Game.app</string>"));
}

#[tokio::test]
async fn macos_without_app_id_skips_packaging() {
    let ws = Workspace::new();
    let config = ws.settings(BuildTarget::OsxUniversal).build().unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::default());
    let outcome = builder.run(&runtime()).await.unwrap();

    assert_eq!(builder.runner().names(), ["Unity"]);
    assert_eq!(outcome.package_path, None);
}

#[tokio::test]
async fn base64_keystore_lives_only_for_the_editor_run() {
    use base64::Engine;

    let ws = Workspace::new();
    let encoded = base64::engine::general_purpose::STANDARD.encode(b"keystore-bytes");
    let config = ws
        .settings(BuildTarget::Android)
        .android_signing(AndroidSigning {
            keystore: Some(KeystoreSource::Base64(encoded)),
            keystore_password: Some("secret".into()),
            keystore_alias: Some("upload".into()),
            keystore_alias_password: Some("secret".into()),
        })
        .build()
        .unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::default());
    builder.run(&runtime()).await.unwrap();

    let script = std::fs::read_to_string(ws.script()).unwrap();
    let line = script
        .lines()
        .find(|l| l.contains("Keystore = @\""))
        .unwrap();
    let path = line
        .split("@\"")
        .nth(1)
        .and_then(|rest| rest.strip_suffix("\";"))
        .unwrap();
    assert!(Path::new(path).starts_with(&ws.tmp));
    assert!(path.ends_with(".keystore"));
    assert!(!Path::new(path).exists());
}

#[tokio::test]
async fn keystore_is_ignored_for_non_android_targets() {
    let ws = Workspace::new();
    let config = ws
        .settings(BuildTarget::Ios)
        .android_signing(AndroidSigning {
            keystore: Some(KeystoreSource::Base64("not base64!".into())),
            ..Default::default()
        })
        .build()
        .unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::default());
    builder.run(&runtime()).await.unwrap();

    let script = std::fs::read_to_string(ws.script()).unwrap();
    assert!(script.contains("Keystore = @\"\";"));
    let leftovers: Vec<_> = std::fs::read_dir(&ws.tmp)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "keystore"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn define_symbols_are_injected_before_the_editor_runs() {
    let ws = Workspace::new();
    let asset = ws.project.join("ProjectSettings/ProjectSettings.asset");
    std::fs::write(
        &asset,
        "PlayerSettings:\n  scriptingDefineSymbols:\n    Android: ANALYTICS\n  productName: Game\n",
    )
    .unwrap();

    let config = ws
        .settings(BuildTarget::Android)
        .editor(EditorSettings {
            path: Some("/opt/unity/Editor/Unity".into()),
            define_symbols: vec!["CI_BUILD".into()],
            ..Default::default()
        })
        .build()
        .unwrap();

    let runner = RecordingRunner {
        snoop: Some(asset.clone()),
        ..Default::default()
    };
    let builder = Builder::with_runner(config, runner);
    builder.run(&runtime()).await.unwrap();

    let seen = builder.runner().snooped.lock().unwrap().clone().unwrap();
    assert!(String::from_utf8(seen)
        .unwrap()
        .contains("    Android: ANALYTICS;CI_BUILD\n"));
}

#[tokio::test]
async fn unsupported_target_never_invokes_a_tool() {
    let ws = Workspace::new();
    let config = ws.settings(BuildTarget::Ps5).build().unwrap();

    let builder = Builder::with_runner(config, RecordingRunner::default());
    let err = builder.run(&runtime()).await.unwrap_err();

    assert!(matches!(err, Error::UnsupportedPlatform { .. }));
    assert!(builder.runner().commands().is_empty());
}
