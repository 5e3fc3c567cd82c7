//! Gradle Kotlin DSL rendering
//!
//! Emits an app-module `build.gradle.kts` in which every value is concrete,
//! so the packaging step no longer depends on the Flutter toolchain object.

use crate::resolver::{ResolvedBuildType, ResolvedDescriptor};
use crate::signing::SigningProfile;

const INDENT: &str = "    ";

/// Quote a value as a Kotlin string literal
fn kotlin_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}

/// Render the resolved descriptor as `build.gradle.kts`
pub fn render(resolved: &ResolvedDescriptor) -> String {
    let mut out = String::new();

    if !resolved.plugins().is_empty() {
        line(&mut out, 0, "plugins {");
        for plugin in resolved.plugins() {
            line(&mut out, 1, &format!("id({})", kotlin_string(plugin)));
        }
        line(&mut out, 0, "}");
        out.push('\n');
    }

    line(&mut out, 0, "android {");
    line(&mut out, 1, &format!("namespace = {}", kotlin_string(resolved.namespace())));
    line(&mut out, 1, &format!("compileSdk = {}", resolved.compile_sdk()));
    if let Some(ndk) = resolved.ndk_version() {
        line(&mut out, 1, &format!("ndkVersion = {}", kotlin_string(ndk)));
    }
    out.push('\n');

    line(&mut out, 1, "compileOptions {");
    line(
        &mut out,
        2,
        &format!(
            "sourceCompatibility = JavaVersion.{}",
            resolved.source_compatibility().gradle_constant()
        ),
    );
    line(
        &mut out,
        2,
        &format!(
            "targetCompatibility = JavaVersion.{}",
            resolved.target_compatibility().gradle_constant()
        ),
    );
    if resolved.desugaring().enabled {
        line(&mut out, 2, "isCoreLibraryDesugaringEnabled = true");
    }
    line(&mut out, 1, "}");
    out.push('\n');

    if let Some(jvm_target) = resolved.jvm_target() {
        line(&mut out, 1, "kotlinOptions {");
        line(&mut out, 2, &format!("jvmTarget = {}", kotlin_string(jvm_target.jvm_target())));
        line(&mut out, 1, "}");
        out.push('\n');
    }

    line(&mut out, 1, "defaultConfig {");
    line(&mut out, 2, &format!("applicationId = {}", kotlin_string(resolved.application_id())));
    line(&mut out, 2, &format!("minSdk = {}", resolved.min_sdk()));
    line(&mut out, 2, &format!("targetSdk = {}", resolved.target_sdk()));
    line(&mut out, 2, &format!("versionCode = {}", resolved.version_code()));
    line(&mut out, 2, &format!("versionName = {}", kotlin_string(resolved.version_name())));
    line(&mut out, 1, "}");

    let custom_profiles = custom_signing_profiles(resolved.build_types());
    if !custom_profiles.is_empty() {
        out.push('\n');
        line(&mut out, 1, "signingConfigs {");
        for profile in custom_profiles {
            render_signing_config(&mut out, profile);
        }
        line(&mut out, 1, "}");
    }

    let build_types: Vec<&ResolvedBuildType> = resolved
        .build_types()
        .iter()
        .filter(|bt| !is_implicit_default(bt))
        .collect();
    if !build_types.is_empty() {
        out.push('\n');
        line(&mut out, 1, "buildTypes {");
        for build_type in build_types {
            render_build_type(&mut out, build_type);
        }
        line(&mut out, 1, "}");
    }
    line(&mut out, 0, "}");
    out.push('\n');

    line(&mut out, 0, "flutter {");
    line(&mut out, 1, &format!("source = {}", kotlin_string(resolved.flutter_source())));
    line(&mut out, 0, "}");

    if !resolved.dependencies().is_empty() {
        out.push('\n');
        line(&mut out, 0, "dependencies {");
        for dependency in resolved.dependencies() {
            line(
                &mut out,
                1,
                &format!("{}({})", dependency.configuration, kotlin_string(&dependency.coordinate)),
            );
        }
        line(&mut out, 0, "}");
    }

    out
}

/// The debug build type signed with the stock debug keystore is what AGP does anyway
fn is_implicit_default(build_type: &ResolvedBuildType) -> bool {
    build_type.name == "debug" && build_type.signing.is_builtin_debug() && !build_type.minify
}

/// Profiles that AGP does not already know, without duplicates.
///
/// A reconfigured `debug` profile counts, since AGP would otherwise fall back
/// to the stock debug keystore.
fn custom_signing_profiles(build_types: &[ResolvedBuildType]) -> Vec<&SigningProfile> {
    let mut profiles: Vec<&SigningProfile> = Vec::new();
    for build_type in build_types {
        let profile = &build_type.signing;
        if !profile.is_builtin_debug() && !profiles.iter().any(|p| p.name == profile.name) {
            profiles.push(profile);
        }
    }
    profiles
}

fn render_signing_config(out: &mut String, profile: &SigningProfile) {
    let accessor = if profile.is_debug() { "getByName" } else { "create" };
    line(out, 2, &format!("{}({}) {{", accessor, kotlin_string(&profile.name)));
    line(
        out,
        3,
        &format!(
            "storeFile = file({})",
            kotlin_string(&profile.store_file.to_string_lossy())
        ),
    );
    line(out, 3, &format!("keyAlias = {}", kotlin_string(&profile.key_alias)));
    if let Some(env) = &profile.store_password_env {
        line(out, 3, &format!("storePassword = System.getenv({})", kotlin_string(env)));
    }
    if let Some(env) = &profile.key_password_env {
        line(out, 3, &format!("keyPassword = System.getenv({})", kotlin_string(env)));
    }
    line(out, 2, "}");
}

fn render_build_type(out: &mut String, build_type: &ResolvedBuildType) {
    let header = match build_type.name.as_str() {
        "debug" | "release" => format!("{} {{", build_type.name),
        other => format!("create({}) {{", kotlin_string(other)),
    };
    line(out, 2, &header);
    line(
        out,
        3,
        &format!(
            "signingConfig = signingConfigs.getByName({})",
            kotlin_string(&build_type.signing.name)
        ),
    );
    if build_type.minify {
        line(out, 3, "isMinifyEnabled = true");
    }
    line(out, 2, "}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::signing::SigningRegistry;
    use crate::testutil::nano_tank_descriptor;
    use crate::toolchain::FlutterToolchain;
    use appdesc_core::config::{Config, SigningConfig};

    fn toolchain_with(name: &str, entry: SigningConfig) -> FlutterToolchain {
        let mut config = Config::default();
        config.schema.signing.insert(name.to_string(), entry);
        FlutterToolchain::new().with_signing(SigningRegistry::from_config(&config))
    }

    #[test]
    fn test_kotlin_string_escaping() {
        assert_eq!(kotlin_string("plain"), "\"plain\"");
        assert_eq!(kotlin_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(kotlin_string("${x}"), "\"\\${x}\"");
        assert_eq!(kotlin_string("C:\\keys"), "\"C:\\\\keys\"");
    }

    #[test]
    fn test_render_flutter_shell() {
        let resolved = resolve(&nano_tank_descriptor(), &FlutterToolchain::new()).unwrap();
        let script = render(&resolved);

        assert!(script.starts_with("plugins {\n    id(\"com.android.application\")\n"));
        assert!(script.contains("    namespace = \"com.example.nano_tank_controller\"\n"));
        assert!(script.contains("    compileSdk = 34\n"));
        assert!(script.contains("    ndkVersion = \"23.1.7779620\"\n"));
        assert!(script.contains("        sourceCompatibility = JavaVersion.VERSION_17\n"));
        assert!(script.contains("        isCoreLibraryDesugaringEnabled = true\n"));
        assert!(script.contains("        jvmTarget = \"17\"\n"));
        assert!(script.contains("        minSdk = 21\n"));
        assert!(script.contains("        versionName = \"1.0\"\n"));
        assert!(script.contains(
            "        release {\n            signingConfig = signingConfigs.getByName(\"debug\")\n        }\n"
        ));
        assert!(!script.contains("        debug {"));
        assert!(!script.contains("signingConfigs {"));
        assert!(script.contains("flutter {\n    source = \"../..\"\n}\n"));
        assert!(script.ends_with(
            "dependencies {\n    coreLibraryDesugaring(\"com.android.tools:desugar_jdk_libs:2.0.4\")\n}\n"
        ));
        assert!(!script.contains("flutter.compileSdkVersion"));
    }

    #[test]
    fn test_render_release_signing_config() {
        let mut descriptor = nano_tank_descriptor();
        descriptor
            .android
            .build_types
            .get_mut("release")
            .unwrap()
            .signing_config = Some("upload".to_string());
        descriptor.android.build_types.get_mut("release").unwrap().minify = true;

        let toolchain = toolchain_with(
            "upload",
            SigningConfig {
                store_file: "/keys/upload.jks".to_string(),
                key_alias: "upload".to_string(),
                store_password_env: Some("UPLOAD_STORE_PASSWORD".to_string()),
                key_password_env: None,
            },
        );

        let script = render(&resolve(&descriptor, &toolchain).unwrap());

        assert!(script.contains("        create(\"upload\") {\n"));
        assert!(script.contains("            storeFile = file(\"/keys/upload.jks\")\n"));
        assert!(script.contains("            storePassword = System.getenv(\"UPLOAD_STORE_PASSWORD\")\n"));
        assert!(!script.contains("keyPassword"));
        assert!(script.contains("            signingConfig = signingConfigs.getByName(\"upload\")\n"));
        assert!(script.contains("            isMinifyEnabled = true\n"));
    }

    #[test]
    fn test_custom_build_type_uses_create() {
        let mut descriptor = nano_tank_descriptor();
        descriptor
            .android
            .build_types
            .insert("staging".to_string(), Default::default());

        let script = render(&resolve(&descriptor, &FlutterToolchain::new()).unwrap());
        assert!(script.contains("        create(\"staging\") {\n"));
    }

    #[test]
    fn test_reconfigured_debug_profile_is_emitted() {
        let toolchain = toolchain_with(
            "debug",
            SigningConfig {
                store_file: "/ci/debug.keystore".to_string(),
                key_alias: "ci".to_string(),
                store_password_env: None,
                key_password_env: None,
            },
        );

        let script = render(&resolve(&nano_tank_descriptor(), &toolchain).unwrap());

        assert!(script.contains("    signingConfigs {\n        getByName(\"debug\") {\n"));
        assert!(script.contains("            storeFile = file(\"/ci/debug.keystore\")\n"));
        assert!(script.contains("            keyAlias = \"ci\"\n"));
        assert!(!script.contains("create(\"debug\")"));
        assert!(script.contains("        debug {\n"));
    }
}
