//! Descriptor fixtures shared by unit tests

use crate::descriptor::{
    AndroidConfig, BuildDescriptor, BuildType, CompileOptions, DefaultConfig, FlutterConfig,
    ValueRef,
};
use std::collections::BTreeMap;

/// The Flutter application shell this tool was written for
pub const NANO_TANK_TOML: &str = r#"
plugins = ["com.android.application", "kotlin-android", "dev.flutter.flutter-gradle-plugin"]

[android]
namespace = "com.example.nano_tank_controller"
compile_sdk = { from = "flutter.compileSdkVersion" }
ndk_version = { from = "flutter.ndkVersion" }

[android.compile_options]
source_compatibility = "VERSION_17"
target_compatibility = 17
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

[flutter]
source = "../.."

[[dependencies]]
configuration = "coreLibraryDesugaring"
coordinate = "com.android.tools:desugar_jdk_libs:2.0.4"
"#;

pub fn nano_tank_descriptor() -> BuildDescriptor {
    BuildDescriptor::from_toml_str(NANO_TANK_TOML).unwrap()
}

/// Minimal descriptor using bare symbols and a release signing reference
pub fn descriptor(application_id: &str, release_signing: &str) -> BuildDescriptor {
    let mut build_types = BTreeMap::new();
    build_types.insert(
        "release".to_string(),
        BuildType {
            signing_config: Some(release_signing.to_string()),
            minify: false,
        },
    );

    BuildDescriptor {
        plugins: vec!["com.android.application".to_string()],
        android: AndroidConfig {
            namespace: application_id.to_string(),
            compile_sdk: ValueRef::symbol("compileSdk"),
            ndk_version: None,
            compile_options: CompileOptions::default(),
            kotlin_options: None,
            default_config: DefaultConfig {
                application_id: application_id.to_string(),
                min_sdk: ValueRef::symbol("minSdk"),
                target_sdk: ValueRef::symbol("targetSdk"),
                version_code: ValueRef::symbol("versionCode"),
                version_name: ValueRef::symbol("versionName"),
            },
            build_types,
        },
        flutter: FlutterConfig::default(),
        dependencies: Vec::new(),
    }
}
