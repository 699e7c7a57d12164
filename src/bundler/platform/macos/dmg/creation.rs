//! Core DMG creation logic using hdiutil.
//!
//! Handles the fundamental DMG creation workflow including:
//! - Staging sources, symlinks and the background picture in a temporary directory
//! - Checking the staged contents fit the requested capacity
//! - Running hdiutil to generate a read-write image
//! - Handing off to layout customization and final conversion

use super::{DiskImageFacility, ImageRequest, conversion, customization};
use crate::bail;
use crate::bundler::{
    Error,
    builder::tool_detection::{HDIUTIL, OSASCRIPT},
    error::{Context, ErrorExt, Result},
    settings::DmgSpec,
    utils::fs,
};
use std::path::{Path, PathBuf};
use std::process::Output;

/// Name of the hidden folder holding the window background.
pub(super) const BACKGROUND_DIR: &str = ".background";

/// [`DiskImageFacility`] backed by the macOS `hdiutil` tool.
///
/// # Process
/// 1. Stage every source and symlink in a temporary directory
/// 2. Reject contents larger than the requested capacity
/// 3. `hdiutil create` a UDRW image from the staging directory
/// 4. Mount it and apply the Finder layout with `osascript`
/// 5. `hdiutil convert` to the requested format, then move into place
///
/// Intermediate images live in the temporary directory, so a failure at any
/// step leaves nothing at the output path.
#[derive(Clone, Debug)]
pub struct HdiutilFacility {
    hdiutil: Option<PathBuf>,
    osascript: Option<PathBuf>,
}

impl HdiutilFacility {
    /// Creates the facility using the tools found in `PATH`.
    pub fn new() -> Self {
        Self::with_tools(HDIUTIL.clone(), OSASCRIPT.clone())
    }

    /// Creates the facility with explicit tool locations.
    ///
    /// `None` means the tool is unavailable; assembly then fails once the
    /// contents have been staged and measured.
    pub fn with_tools(hdiutil: Option<PathBuf>, osascript: Option<PathBuf>) -> Self {
        Self { hdiutil, osascript }
    }
}

impl Default for HdiutilFacility {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskImageFacility for HdiutilFacility {
    async fn create_image(&self, request: &ImageRequest<'_>) -> Result<()> {
        let spec = request.spec;

        let work_dir =
            tempfile::tempdir().context("creating temporary directory for DMG contents")?;
        let staging_path = work_dir.path().join("contents");

        stage_contents(spec, &staging_path).await?;
        check_capacity(spec, &staging_path).await?;

        let hdiutil = self.hdiutil.as_deref().ok_or_else(|| {
            Error::AssemblyFailure(
                "hdiutil not found in PATH (disk images can only be built on macOS)".into(),
            )
        })?;
        let osascript = self.osascript.as_deref().ok_or_else(|| {
            Error::AssemblyFailure(
                "osascript not found in PATH (needed to apply the window layout)".into(),
            )
        })?;

        let rw_image = work_dir.path().join("rw.dmg");
        create_rw_image(hdiutil, request, &staging_path, &rw_image).await?;

        customization::apply_layout(hdiutil, osascript, &rw_image, request.volume_name, spec)
            .await?;

        let converted = work_dir.path().join("converted.dmg");
        conversion::convert_image(hdiutil, &rw_image, spec.format(), &converted).await?;
        fs::move_file(&converted, request.output_path)
            .await
            .fs_context("moving image into place", request.output_path)?;

        // tempfile automatically cleans up staging directory
        drop(work_dir);

        Ok(())
    }
}

/// Copy sources, create symlinks and stage the background picture.
async fn stage_contents(spec: &DmgSpec, staging_path: &Path) -> Result<()> {
    fs::create_dir_all(staging_path, true).await?;

    for source in spec.source_paths() {
        let Some(name) = source.file_name() else {
            bail!("Invalid source path: {}", source.display());
        };
        let staged = staging_path.join(name);

        log::debug!("Copying {} to staging", source.display());
        fs::copy_entry(source, &staged)
            .await
            .with_context(|| format!("staging {}", source.display()))?;
    }

    for (name, target) in spec.symlinks() {
        let link = staging_path.join(name);
        log::debug!("Linking {} -> {}", name, target.display());
        fs::symlink(target, &link).fs_context("creating symlink", &link)?;
    }

    if let Some(background) = spec.background() {
        let file_name = background
            .file_name()
            .ok_or_else(|| Error::GenericError("Invalid background image path".into()))?;
        let dest = staging_path.join(BACKGROUND_DIR).join(file_name);
        fs::copy_file(background, &dest).await?;
        log::debug!("Staged background image at {}", dest.display());
    }

    Ok(())
}

/// Fail instead of letting hdiutil truncate or half-fill the image.
async fn check_capacity(spec: &DmgSpec, staging_path: &Path) -> Result<()> {
    let needed = fs::tree_size(staging_path).await?;
    let capacity = spec.size().bytes();
    log::debug!("Staged {} bytes for a {} byte image", needed, capacity);

    if needed > capacity {
        return Err(Error::AssemblyFailure(format!(
            "insufficient capacity: contents need {} bytes but the image size is {} ({} bytes)",
            needed,
            spec.size(),
            capacity
        )));
    }
    Ok(())
}

async fn create_rw_image(
    hdiutil: &Path,
    request: &ImageRequest<'_>,
    staging_path: &Path,
    rw_image: &Path,
) -> Result<()> {
    log::info!("Creating read-write image...");

    let size = request.spec.size().to_hdiutil_arg();
    let staging_str = utf8(staging_path, "staging path")?;
    let image_str = utf8(rw_image, "image path")?;

    run_hdiutil(
        hdiutil,
        &[
            "create",
            "-size",
            &size,
            "-fs",
            "HFS+",
            "-volname",
            request.volume_name,
            "-srcfolder",
            staging_str,
            "-format",
            "UDRW",
            "-ov",
            image_str,
        ],
    )
    .await?;

    Ok(())
}

/// Run hdiutil, turning a non-zero exit into [`Error::AssemblyFailure`].
pub(super) async fn run_hdiutil(hdiutil: &Path, args: &[&str]) -> Result<Output> {
    log::debug!("Running hdiutil {}", args.join(" "));

    let output = tokio::process::Command::new(hdiutil)
        .args(args)
        .output()
        .await
        .map_err(|e| Error::AssemblyFailure(format!("Failed to execute hdiutil command: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::AssemblyFailure(format!(
            "hdiutil {} failed: {}",
            args.first().copied().unwrap_or_default(),
            stderr.trim()
        )));
    }

    Ok(output)
}

pub(super) fn utf8<'a>(path: &'a Path, what: &str) -> Result<&'a str> {
    path.to_str().ok_or_else(|| {
        Error::GenericError(format!(
            "Invalid {} (contains non-UTF8 characters): {}",
            what,
            path.display()
        ))
    })
}
