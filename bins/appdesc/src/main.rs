//! appdesc CLI
//!
//! Resolves Android app-module descriptors against the Flutter toolchain and
//! emits the concrete result as text, JSON or Gradle Kotlin DSL.

use anyhow::Result;
use appdesc_android::{gradle, resolve, BuildDescriptor, FlutterToolchain, ResolvedDescriptor};
use appdesc_android::signing::SigningRegistry;
use appdesc_cli::output::{format_count, OutputFormat, Status};
use appdesc_core::config::Config;
use appdesc_core::error::{exit_codes, Error, ErrorCode};
use appdesc_telemetry::{level_for_verbosity, TelemetryConfig};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "appdesc")]
#[command(about = "Resolve Android build descriptors into concrete Gradle settings")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a descriptor and print the concrete settings
    Resolve {
        /// Descriptor file (defaults to [general] descriptor)
        descriptor: Option<PathBuf>,
        /// Flutter local.properties to read version values from
        #[arg(long)]
        local_properties: Option<PathBuf>,
    },

    /// Resolve a descriptor and report only success or failure
    Check {
        /// Descriptor file (defaults to [general] descriptor)
        descriptor: Option<PathBuf>,
        /// Flutter local.properties to read version values from
        #[arg(long)]
        local_properties: Option<PathBuf>,
    },

    /// Resolve a descriptor and emit build.gradle.kts
    Render {
        /// Descriptor file (defaults to [general] descriptor)
        descriptor: Option<PathBuf>,
        /// Flutter local.properties to read version values from
        #[arg(long)]
        local_properties: Option<PathBuf>,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the known signing profiles
    Profiles,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = Config::load(cli.config.as_deref());

    let level = level_for_verbosity(cli.verbose, cli.quiet)
        .map(str::to_string)
        .or_else(|| config.as_ref().ok().map(|c| c.schema.logging.level.clone()))
        .unwrap_or_else(|| "warn".to_string());
    appdesc_telemetry::init_with_config(
        TelemetryConfig::with_level(level)
            .with_ansi(!cli.no_color)
            .with_target(cli.verbose >= 3),
    )?;

    let config = match config {
        Ok(config) => config,
        Err(e) => std::process::exit(report(&e, cli.format)),
    };
    tracing::debug!(
        path = ?config.path,
        "configuration loaded"
    );

    let exit_code = match cli.command {
        Commands::Resolve { descriptor, local_properties } => {
            run_resolve(&config, descriptor.as_deref(), local_properties.as_deref(), cli.format)
        }
        Commands::Check { descriptor, local_properties } => run_check(
            &config,
            descriptor.as_deref(),
            local_properties.as_deref(),
            cli.format,
            cli.quiet,
        ),
        Commands::Render { descriptor, local_properties, output } => run_render(
            &config,
            descriptor.as_deref(),
            local_properties.as_deref(),
            output.as_deref(),
            cli.format,
            cli.quiet,
        ),
        Commands::Profiles => run_profiles(&config, cli.format),
    };

    std::process::exit(exit_code);
}

/// Print an error in the requested format and return its exit code
fn report(error: &Error, format: OutputFormat) -> i32 {
    if format.is_json() {
        match serde_json::to_string_pretty(&error.to_report()) {
            Ok(json) => println!("{}", json),
            Err(_) => eprintln!("{} {}", "Error:".red().bold(), error.message),
        }
    } else {
        Status::error(&format!("[{}] {}", error.code, error.message));
        if let Some(context) = &error.context {
            Status::hint(context);
        }
        if let Some(suggestion) = &error.suggestion {
            Status::hint(suggestion);
        }
    }
    error.code.exit_code()
}

/// Serialisation of our own output failing is an internal error, not bad input
fn output_error(err: serde_json::Error) -> Error {
    Error::new(ErrorCode::Internal, format!("Failed to serialize output: {}", err)).with_source(err)
}

/// Print a value as pretty JSON on stdout
fn print_json<T: Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            exit_codes::SUCCESS
        }
        Err(e) => report(&output_error(e), OutputFormat::Json),
    }
}

fn descriptor_path(config: &Config, descriptor: Option<&Path>) -> PathBuf {
    descriptor
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.resolve_path(&config.schema.general.descriptor))
}

fn load_and_resolve(
    config: &Config,
    descriptor: Option<&Path>,
    local_properties: Option<&Path>,
) -> appdesc_core::Result<ResolvedDescriptor> {
    let path = descriptor_path(config, descriptor);
    let context = format!("descriptor {}", path.display());

    let descriptor = BuildDescriptor::load(&path).map_err(|e| Error::from(e).with_context(&context))?;
    let toolchain = FlutterToolchain::from_config(config, local_properties)?;

    let resolved = resolve(&descriptor, &toolchain).map_err(|e| Error::from(e).with_context(&context))?;
    tracing::info!(
        path = %path.display(),
        application_id = resolved.application_id(),
        "descriptor resolved"
    );
    Ok(resolved)
}

fn run_resolve(
    config: &Config,
    descriptor: Option<&Path>,
    local_properties: Option<&Path>,
    format: OutputFormat,
) -> i32 {
    let resolved = match load_and_resolve(config, descriptor, local_properties) {
        Ok(resolved) => resolved,
        Err(e) => return report(&e, format),
    };

    if format.is_json() {
        return print_json(&resolved);
    }

    print_summary(&resolved);
    exit_codes::SUCCESS
}

fn print_summary(resolved: &ResolvedDescriptor) {
    Status::header(resolved.application_id());
    Status::field("namespace", resolved.namespace());
    Status::field("compileSdk", resolved.compile_sdk());
    Status::field("minSdk", resolved.min_sdk());
    Status::field("targetSdk", resolved.target_sdk());
    if let Some(ndk) = resolved.ndk_version() {
        Status::field("ndkVersion", ndk);
    }
    Status::field("versionCode", resolved.version_code());
    Status::field("versionName", resolved.version_name());
    Status::field("sourceCompatibility", resolved.source_compatibility());
    Status::field("targetCompatibility", resolved.target_compatibility());
    if let Some(jvm_target) = resolved.jvm_target() {
        Status::field("jvmTarget", jvm_target.jvm_target());
    }
    if let Some(library) = &resolved.desugaring().library {
        Status::field("desugaring", library);
    }
    Status::field("flutter.source", resolved.flutter_source());

    Status::header(&format_count(resolved.build_types().len(), "build type", "build types"));
    for build_type in resolved.build_types() {
        let minify = if build_type.minify { " (minified)" } else { "" };
        Status::field(
            &build_type.name,
            format!("signed with '{}'{}", build_type.signing.name, minify),
        );
    }

    if !resolved.dependencies().is_empty() {
        Status::header(&format_count(resolved.dependencies().len(), "dependency", "dependencies"));
        for dependency in resolved.dependencies() {
            Status::field(&dependency.configuration, &dependency.coordinate);
        }
    }
}

fn run_check(
    config: &Config,
    descriptor: Option<&Path>,
    local_properties: Option<&Path>,
    format: OutputFormat,
    quiet: bool,
) -> i32 {
    match load_and_resolve(config, descriptor, local_properties) {
        Ok(resolved) => {
            if format.is_json() {
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": true,
                        "application_id": resolved.application_id(),
                    })
                );
            } else if !quiet {
                Status::success(&format!("{} resolves cleanly", resolved.application_id()));
            }
            exit_codes::SUCCESS
        }
        Err(e) => report(&e, format),
    }
}

fn run_render(
    config: &Config,
    descriptor: Option<&Path>,
    local_properties: Option<&Path>,
    output: Option<&Path>,
    format: OutputFormat,
    quiet: bool,
) -> i32 {
    let resolved = match load_and_resolve(config, descriptor, local_properties) {
        Ok(resolved) => resolved,
        Err(e) => return report(&e, format),
    };
    let script = gradle::render(&resolved);

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, script) {
                let error = Error::from(e).with_context(format!("writing {}", path.display()));
                return report(&error, format);
            }
            if !quiet {
                Status::success(&format!("Wrote {}", path.display()));
            }
        }
        None => print!("{}", script),
    }
    exit_codes::SUCCESS
}

fn run_profiles(config: &Config, format: OutputFormat) -> i32 {
    let registry = SigningRegistry::from_config(config);

    if format.is_json() {
        let profiles: Vec<_> = registry.iter().collect();
        return print_json(&profiles);
    }

    let count = registry.iter().count();
    Status::header(&format_count(count, "signing profile", "signing profiles"));
    for profile in registry.iter() {
        Status::field(
            &profile.name,
            format!("{} ({})", profile.store_file.display(), profile.key_alias),
        );
    }
    exit_codes::SUCCESS
}
