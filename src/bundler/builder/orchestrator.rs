//! Main bundler orchestration.
//!
//! This module provides the [`DmgBundler`] orchestrator that turns a built
//! project into a disk image and reports on the result.

use crate::bundler::{
    Error, Result,
    error::ErrorExt,
    platform::macos::dmg::{DiskImageFacility, HdiutilFacility, assemble},
    settings::{DmgFormat, DmgSpec},
    utils::fs,
};
use crate::metadata::DmgConfig;
use crate::project::ProjectLayout;
use std::path::PathBuf;

use super::checksum::calculate_sha256;

/// A finished disk image.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BundledArtifact {
    /// Location of the image
    pub path: PathBuf,
    /// Volume label
    pub volume_name: String,
    /// Image format
    pub format: DmgFormat,
    /// Size on disk in bytes
    pub size: u64,
    /// Hex-encoded SHA-256 of the image
    pub checksum: String,
}

/// Builds the disk image for a project.
///
/// # Examples
///
/// ```no_run
/// use dmg_assembler::bundler::DmgBundler;
/// use dmg_assembler::project::ProjectLayout;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let layout = ProjectLayout::new("/work/repo", "VideoDownloader")?;
/// let artifact = DmgBundler::new(layout).bundle().await?;
/// println!("Created {} ({} bytes)", artifact.path.display(), artifact.size);
/// println!("SHA256: {}", artifact.checksum);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DmgBundler<F = HdiutilFacility> {
    layout: ProjectLayout,
    config: Option<DmgConfig>,
    facility: F,
}

impl DmgBundler<HdiutilFacility> {
    /// Creates a bundler that builds images with `hdiutil`.
    pub fn new(layout: ProjectLayout) -> Self {
        Self::with_facility(layout, HdiutilFacility::new())
    }
}

impl<F: DiskImageFacility> DmgBundler<F> {
    /// Creates a bundler using a custom disk image facility.
    pub fn with_facility(layout: ProjectLayout, facility: F) -> Self {
        Self {
            layout,
            config: None,
            facility,
        }
    }

    /// Applies layout overrides on top of the drag-to-install defaults.
    pub fn with_config(mut self, config: DmgConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// The image description for this project.
    pub fn spec(&self) -> Result<DmgSpec> {
        let app_path = self.layout.app_path();
        let builder = DmgSpec::application_layout_builder(&app_path);
        let builder = match &self.config {
            Some(config) => {
                let app_name = format!("{}.app", self.layout.name());
                config.apply(builder, &app_name)
            }
            None => builder,
        };
        builder.build()
    }

    /// Builds the image and returns its metadata.
    ///
    /// # Process
    /// 1. Check the .app bundle exists
    /// 2. Resolve the [`DmgSpec`]
    /// 3. Create the output directory
    /// 4. Assemble; a previous image is only replaced once the new one is complete
    /// 5. Measure and checksum the result
    pub async fn bundle(&self) -> Result<BundledArtifact> {
        let app_path = self.layout.app_path();
        if !app_path.exists() {
            return Err(Error::SourceMissing(app_path));
        }

        let spec = self.spec()?;
        let dmg_path = self.layout.dmg_path();
        let volume_name = self.layout.volume_name();

        crate::bundler::platform::macos::dmg::validate_volume_name(volume_name)?;

        if let Some(output_dir) = dmg_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(output_dir, false).await?;
        }

        assemble(&dmg_path, volume_name, &spec, &self.facility).await?;

        let size = tokio::fs::metadata(&dmg_path)
            .await
            .fs_context("reading artifact metadata", &dmg_path)?
            .len();
        let checksum = calculate_sha256(&dmg_path).await?;

        Ok(BundledArtifact {
            path: dmg_path,
            volume_name: volume_name.to_string(),
            format: spec.format(),
            size,
            checksum,
        })
    }
}
