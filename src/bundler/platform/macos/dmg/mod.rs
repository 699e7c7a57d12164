//! macOS DMG disk image assembler.
//!
//! Wraps application bundles into drag-to-install disk images. The actual
//! image construction is delegated to a [`DiskImageFacility`]; production code
//! uses [`HdiutilFacility`], tests substitute a recording fake.
//!
//! # Architecture
//!
//! This module is organized into logical submodules:
//! - `creation` - Staging and `hdiutil create` ([`HdiutilFacility`])
//! - `customization` - Finder window layout via AppleScript
//! - `conversion` - Format conversion (UDRW → final format)

mod conversion;
mod creation;
mod customization;

use crate::bundler::{Error, Result, settings::DmgSpec};
use std::future::Future;
use std::path::Path;

pub use creation::HdiutilFacility;
pub use customization::layout_script;

/// Longest volume label accepted by HFS+ and APFS.
pub const MAX_VOLUME_NAME_LEN: usize = 255;

/// Everything the facility needs to build one image.
///
/// Values are forwarded exactly as given to [`assemble`].
#[derive(Clone, Copy, Debug)]
pub struct ImageRequest<'a> {
    /// Where the finished image must end up
    pub output_path: &'a Path,
    /// Volume label shown when mounted
    pub volume_name: &'a str,
    /// Contents and layout
    pub spec: &'a DmgSpec,
}

/// Host platform disk image creation facility.
///
/// Implementations receive a request whose sources have already been
/// verified to exist, and either leave a complete image at
/// `request.output_path` or return an error.
pub trait DiskImageFacility {
    /// Build the image described by `request`.
    fn create_image(&self, request: &ImageRequest<'_>) -> impl Future<Output = Result<()>> + Send;
}

/// Assemble a disk image at `output_path`.
///
/// # Process
/// 1. Validate the volume label
/// 2. Verify every source (and the background picture) exists
/// 3. Verify the output directory exists
/// 4. Delegate to `facility`, wrapping any failure as [`Error::AssemblyFailure`]
///
/// Steps 1-3 run before the facility is touched, so a rejected request never
/// leaves a partial image behind.
///
/// Two assemblies writing the same `output_path` at once are not supported.
pub async fn assemble<F: DiskImageFacility>(
    output_path: &Path,
    volume_name: &str,
    spec: &DmgSpec,
    facility: &F,
) -> Result<()> {
    validate_volume_name(volume_name)?;

    for source in spec.source_paths().iter().map(|p| p.as_path()).chain(spec.background()) {
        if !source.exists() {
            return Err(Error::SourceMissing(source.to_path_buf()));
        }
    }

    let output_dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !output_dir.is_dir() {
        return Err(Error::OutputDirectoryMissing(output_dir.to_path_buf()));
    }

    log::info!(
        "Assembling {} image {:?} at {}",
        spec.format(),
        volume_name,
        output_path.display()
    );

    let request = ImageRequest {
        output_path,
        volume_name,
        spec,
    };

    facility.create_image(&request).await.map_err(|e| match e {
        Error::AssemblyFailure(_) => e,
        other => Error::AssemblyFailure(other.to_string()),
    })?;

    log::info!("✓ Created DMG: {}", output_path.display());
    Ok(())
}

/// Check that `name` can be used as a volume label.
///
/// Rejects empty names, `/` (POSIX separator), `:` (Finder separator) and
/// names longer than [`MAX_VOLUME_NAME_LEN`] characters.
pub fn validate_volume_name(name: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(Error::InvalidVolumeName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return reject("volume name cannot be empty");
    }
    if name.contains('/') {
        return reject("volume name cannot contain '/'");
    }
    if name.contains(':') {
        return reject("volume name cannot contain ':'");
    }
    if name.chars().count() > MAX_VOLUME_NAME_LEN {
        return reject("volume name is longer than 255 characters");
    }
    Ok(())
}
