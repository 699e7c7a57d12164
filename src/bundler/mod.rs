//! Disk image bundling.
//!
//! - [`settings`] - [`DmgSpec`] and its value types
//! - [`platform`] - the image assembler and the hdiutil facility
//! - [`builder`] - [`DmgBundler`] orchestration, checksums, tool detection

pub mod builder;
pub mod error;
pub mod platform;
pub mod settings;
pub mod utils;

pub use builder::{BundledArtifact, DmgBundler};
pub use error::{Error, Result};
pub use platform::macos::dmg::{
    DiskImageFacility, HdiutilFacility, ImageRequest, assemble, validate_volume_name,
};
pub use settings::{DmgFormat, DmgSpec, DmgSpecBuilder, IconPosition, ImageSize, WindowRect};
