//! Build script template constants.

/// Bumped whenever [`BUILD_SCRIPT_TEMPLATE`] changes shape.
pub const BUILD_SCRIPT_TEMPLATE_VERSION: &str = "3";

/// Class name of the generated entry point.
pub const BUILD_SCRIPT_CLASS: &str = "UnityBuildScript";

/// Method the editor is pointed at via `-executeMethod`.
pub const BUILD_SCRIPT_ENTRY_POINT: &str = "UnityBuildScript.PerformBuild";

/// Handlebars template for `Assets/Editor/UnityBuildScript.cs`.
///
/// Every value is pre-quoted by the generator for the literal kind it lands
/// in (`@"..."` verbatim strings for paths, `"..."` for everything else).
/// Only the configure method for the embedded target runs.
pub const BUILD_SCRIPT_TEMPLATE: &str = r#"// <auto-generated>
// Generated by unity_build_action (build script template v{{template_version}}).
// This file is overwritten on every build.
// </auto-generated>
using System;
using System.IO;
using System.Linq;
using UnityEditor;
using UnityEditor.Build.Reporting;
using UnityEngine;

public static class UnityBuildScript
{
	public const BuildTarget Target = BuildTarget.{{build_target}};

	public static readonly string OutputDirectory = @"{{output_directory}}";
	public static readonly string OutputFileName = @"{{output_file_name}}";

	public static readonly int Revision = {{revision}};
	public static readonly string BundleVersion = "{{bundle_version}}";
	public static readonly string ApplicationIdentifier = "{{app_id}}";
	public static readonly bool Development = {{development}};

	public static readonly string TeamID = "{{team_id}}";
	public static readonly string ProvisioningProfileUUID = "{{provisioning_profile_uuid}}";
	public static readonly string ProvisioningProfileKind = "{{provisioning_profile_type}}";

	public static readonly string Keystore = @"{{keystore}}";
	public static readonly string KeystorePassword = "{{keystore_password}}";
	public static readonly string KeystoreAlias = "{{keystore_alias}}";
	public static readonly string KeystoreAliasPassword = "{{keystore_alias_password}}";

	static BuildTargetGroup TargetGroup => BuildPipeline.GetBuildTargetGroup(Target);

	static BuildOptions GetBuildOptions()
	{
		var options = BuildOptions.None;

		if (Development) {
			options |= BuildOptions.Development;
		}

		return options;
	}

	static void ConfigureCommon()
	{
		if (!string.IsNullOrWhiteSpace(BundleVersion)) {
			PlayerSettings.bundleVersion = BundleVersion;
		}
		if (!string.IsNullOrWhiteSpace(ApplicationIdentifier)) {
			PlayerSettings.SetApplicationIdentifier(TargetGroup, ApplicationIdentifier);
		}
	}

	static void ConfigureIOS()
	{
		PlayerSettings.iOS.buildNumber = Revision.ToString();

		if (!string.IsNullOrWhiteSpace(TeamID)) {
			PlayerSettings.iOS.appleDeveloperTeamID = TeamID;
		}
		if (!string.IsNullOrWhiteSpace(ProvisioningProfileUUID)) {
			PlayerSettings.iOS.appleEnableAutomaticSigning = false;
			PlayerSettings.iOS.iOSManualProvisioningProfileID = ProvisioningProfileUUID;

			if (!string.IsNullOrWhiteSpace(ProvisioningProfileKind)) {
				PlayerSettings.iOS.iOSManualProvisioningProfileType =
					(ProvisioningProfileType)Enum.Parse(typeof(ProvisioningProfileType), ProvisioningProfileKind);
			}
		}
	}

	static void ConfigureAndroid()
	{
		PlayerSettings.Android.bundleVersionCode = Revision;
		EditorUserBuildSettings.buildAppBundle = true;

		if (string.IsNullOrWhiteSpace(Keystore)) {
			return;
		}
		if (string.IsNullOrWhiteSpace(KeystorePassword)
			|| string.IsNullOrWhiteSpace(KeystoreAlias)
			|| string.IsNullOrWhiteSpace(KeystoreAliasPassword)) {
			throw new Exception("Keystore is set but keystore password, alias or alias password is missing.");
		}

		PlayerSettings.Android.useCustomKeystore = true;
		PlayerSettings.Android.keystoreName = Keystore;
		PlayerSettings.Android.keystorePass = KeystorePassword;
		PlayerSettings.Android.keyaliasName = KeystoreAlias;
		PlayerSettings.Android.keyaliasPass = KeystoreAliasPassword;
	}

	static void ConfigureMacOS()
	{
		PlayerSettings.macOS.buildNumber = Revision.ToString();
	}

	static void Configure()
	{
		ConfigureCommon();

		switch (Target) {
		case BuildTarget.iOS:
			ConfigureIOS();
			break;
		case BuildTarget.Android:
			ConfigureAndroid();
			break;
		case BuildTarget.StandaloneOSX:
			ConfigureMacOS();
			break;
		}
	}

	public static void PerformBuild()
	{
		try {
			Configure();

			var report = BuildPipeline.BuildPlayer(new BuildPlayerOptions {
				scenes = EditorBuildSettings.scenes.Where(x => x.enabled).Select(x => x.path).ToArray(),
				locationPathName = Path.Combine(OutputDirectory, OutputFileName),
				target = Target,
				options = GetBuildOptions()
			});

			if (report.summary.result == BuildResult.Succeeded) {
				EditorApplication.Exit(0);
			} else {
				throw new Exception($"Build {report.summary.result}: {report.summary.totalErrors} error(s)");
			}
		} catch (Exception ex) {
			Debug.LogException(ex);
			EditorApplication.Exit(1);
		}
	}
}
"#;
