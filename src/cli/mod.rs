//! Command line interface for the DMG packager.
//!
//! Resolves the project layout, runs the bundler and maps the outcome to a
//! process exit code.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::DmgBundler;
use crate::error::{CliError, EXIT_INVALID_INPUT, EXIT_SUCCESS, PackagerError, Result};
use crate::metadata;
use crate::project::{self, ProjectLayout};
use path_absolutize::Absolutize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Main CLI entry point
///
/// Returns the exit code. Errors from the packaging run are reported here
/// and converted to their exit code; only failures to write to the
/// terminal propagate.
pub async fn run() -> Result<i32> {
    let args = match Args::parse_args() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let code = if e.use_stderr() {
                EXIT_INVALID_INPUT
            } else {
                EXIT_SUCCESS
            };
            e.print()?;
            return Ok(code);
        }
    };
    run_with_args(&args).await
}

/// Run with already-parsed arguments.
pub async fn run_with_args(args: &Args) -> Result<i32> {
    let runtime = RuntimeConfig::from(args);

    match execute(args, &runtime).await {
        Ok(()) => Ok(EXIT_SUCCESS),
        Err(e) => {
            runtime.error(&e.to_string())?;
            for suggestion in e.recovery_suggestions() {
                runtime.output().error(&suggestion)?;
            }
            Ok(e.exit_code())
        }
    }
}

async fn execute(args: &Args, runtime: &RuntimeConfig) -> Result<()> {
    args.validate()
        .map_err(|reason| PackagerError::Cli(CliError::InvalidArguments { reason }))?;

    let root = match &args.root {
        Some(root) => absolute(root)?,
        None => project::discover_root(&std::env::current_dir()?).await?,
    };

    let mut layout = ProjectLayout::new(root, &args.project_name)?;
    if let Some(output) = &args.output {
        layout = layout.with_output(absolute(output)?);
    }
    if let Some(volume_name) = &args.volume_name {
        layout = layout.with_volume_name(volume_name);
    }

    runtime.output().println(&format!("Creating DMG for {}", layout.name()))?;
    runtime.indent(&format!("App path: {}", layout.app_path().display()))?;
    runtime.indent(&format!("DMG path: {}", layout.dmg_path().display()))?;

    let explicit_config = args.config.as_deref().map(absolute).transpose()?;
    let config = metadata::find_config(explicit_config.as_deref(), &layout.default_config_path())?;

    let mut bundler = DmgBundler::new(layout);
    if let Some(config) = config {
        runtime.verbose_println("Using layout overrides from dmg.toml")?;
        bundler = bundler.with_config(config);
    }

    let spec = bundler.spec()?;
    let entries: BTreeSet<String> = spec.root_entries().collect();
    for name in spec.icon_positions().keys() {
        if !entries.contains(name) {
            runtime.warn(&format!(
                "Icon position for {name:?} ignored: no such item in the image"
            ))?;
        }
    }
    runtime.verbose_println(&format!(
        "Format {}, size {}, window {:?}, icons {}pt, text {}pt",
        spec.format(),
        spec.size(),
        spec.window_rect(),
        spec.icon_size(),
        spec.text_size()
    ))?;

    runtime.progress("Assembling disk image...")?;
    let artifact = bundler.bundle().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&artifact)?);
    } else {
        runtime.success(&format!(
            "DMG created successfully: {}",
            artifact.path.display()
        ))?;
        runtime.indent(&format!("Size: {} bytes", artifact.size))?;
        runtime.indent(&format!("SHA256: {}", artifact.checksum))?;
    }

    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}
