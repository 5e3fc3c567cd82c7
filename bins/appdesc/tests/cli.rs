use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const DESCRIPTOR: &str = r#"
plugins = ["com.android.application", "kotlin-android", "dev.flutter.flutter-gradle-plugin"]

[android]
namespace = "com.example.nano_tank_controller"
compile_sdk = { from = "flutter.compileSdkVersion" }
ndk_version = { from = "flutter.ndkVersion" }

[android.compile_options]
source_compatibility = "VERSION_17"
target_compatibility = "VERSION_17"
core_library_desugaring = true

[android.kotlin_options]
jvm_target = "17"

[android.default_config]
application_id = "com.example.nano_tank_controller"
min_sdk = { from = "flutter.minSdkVersion" }
target_sdk = { from = "flutter.targetSdkVersion" }
version_code = { from = "flutter.versionCode" }
version_name = { from = "flutter.versionName" }

[android.build_types.release]
signing_config = "debug"

[[dependencies]]
configuration = "coreLibraryDesugaring"
coordinate = "com.android.tools:desugar_jdk_libs:2.0.4"
"#;

fn workspace(descriptor: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("descriptor.toml"), descriptor).unwrap();
    dir
}

fn appdesc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("appdesc").unwrap();
    cmd.current_dir(dir).arg("--no-color").env_remove("RUST_LOG");
    cmd
}

#[test]
fn resolve_prints_json() {
    let dir = workspace(DESCRIPTOR);

    appdesc(dir.path())
        .args(["resolve", "descriptor.toml", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"compile_sdk\": 34"))
        .stdout(predicate::str::contains("\"min_sdk\": 21"))
        .stdout(predicate::str::contains("\"version_name\": \"1.0\""))
        .stdout(predicate::str::contains("compileSdkVersion").not());
}

#[test]
fn resolve_reads_local_properties() {
    let dir = workspace(DESCRIPTOR);
    std::fs::write(
        dir.path().join("local.properties"),
        "flutter.versionCode=7\nflutter.versionName=2.1.0\n",
    )
    .unwrap();

    appdesc(dir.path())
        .args(["-f", "json", "resolve", "descriptor.toml"])
        .args(["--local-properties", "local.properties"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version_code\": 7"))
        .stdout(predicate::str::contains("\"version_name\": \"2.1.0\""));
}

#[test]
fn resolve_uses_configured_descriptor() {
    let dir = workspace(DESCRIPTOR);
    std::fs::write(
        dir.path().join(".appdesc.toml"),
        "[general]\ndescriptor = \"descriptor.toml\"\n\n[toolchain]\ncompileSdkVersion = 35\ntargetSdkVersion = 35\n",
    )
    .unwrap();

    appdesc(dir.path())
        .args(["resolve", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"compile_sdk\": 35"));
}

#[test]
fn missing_signing_profile_exits_with_validation_code() {
    let dir = workspace(&DESCRIPTOR.replace("signing_config = \"debug\"", "signing_config = \"release\""));

    appdesc(dir.path())
        .args(["check", "descriptor.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing signing profile 'release'"));
}

#[test]
fn configured_signing_profile_resolves() {
    let dir = workspace(&DESCRIPTOR.replace("signing_config = \"debug\"", "signing_config = \"release\""));
    std::fs::write(
        dir.path().join(".appdesc.toml"),
        "[signing.release]\nstore_file = \"/keys/release.jks\"\nkey_alias = \"release\"\n",
    )
    .unwrap();

    appdesc(dir.path())
        .args(["check", "descriptor.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resolves cleanly"));
}

#[test]
fn invalid_application_id_reports_json_error() {
    let dir = workspace(&DESCRIPTOR.replace(
        "application_id = \"com.example.nano_tank_controller\"",
        "application_id = \"\"",
    ));

    appdesc(dir.path())
        .args(["--format", "json", "check", "descriptor.toml"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"code_str\": \"E9002\""));
}

#[test]
fn missing_descriptor_fails() {
    let dir = tempfile::tempdir().unwrap();

    appdesc(dir.path())
        .args(["check", "nope.toml"])
        .assert()
        .code(1);
}

#[test]
fn explicit_missing_config_is_a_config_error() {
    let dir = workspace(DESCRIPTOR);

    appdesc(dir.path())
        .args(["--config", "absent.toml", "check", "descriptor.toml"])
        .assert()
        .code(3);
}

#[test]
fn render_writes_gradle_script() {
    let dir = workspace(DESCRIPTOR);

    appdesc(dir.path())
        .args(["render", "descriptor.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compileSdk = 34"))
        .stdout(predicate::str::contains("isCoreLibraryDesugaringEnabled = true"))
        .stdout(predicate::str::contains(
            "coreLibraryDesugaring(\"com.android.tools:desugar_jdk_libs:2.0.4\")",
        ));
}

#[test]
fn render_to_file() {
    let dir = workspace(DESCRIPTOR);

    appdesc(dir.path())
        .args(["-q", "render", "descriptor.toml", "--output", "build.gradle.kts"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let script = std::fs::read_to_string(dir.path().join("build.gradle.kts")).unwrap();
    assert!(script.contains("namespace = \"com.example.nano_tank_controller\""));
}

#[test]
fn profiles_lists_debug() {
    let dir = tempfile::tempdir().unwrap();

    appdesc(dir.path())
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("debug"))
        .stdout(predicate::str::contains("androiddebugkey"));
}

#[test]
fn render_reports_json_errors() {
    let dir = workspace(&DESCRIPTOR.replace("signing_config = \"debug\"", "signing_config = \"release\""));

    appdesc(dir.path())
        .args(["--format", "json", "render", "descriptor.toml"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"code_str\": \"E9003\""));
}

#[test]
fn profiles_anchor_relative_store_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".appdesc.toml"),
        "[signing.release]\nstore_file = \"keys/release.jks\"\nkey_alias = \"release\"\n",
    )
    .unwrap();

    appdesc(dir.path())
        .args(["-f", "json", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r#""store_file": "/[^"]*/keys/release\.jks""#).unwrap());
}
