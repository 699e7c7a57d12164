//! Disk image packager for macOS applications
//!
//! Wraps a pre-built `.app` bundle into a distributable `.dmg` containing the
//! bundle, an `Applications` shortcut and a fixed Finder window layout.
//!
//! It can be used both as a CLI tool (`create_dmg`) and as a library
//! dependency. The image itself is produced by a
//! [`DiskImageFacility`](bundler::DiskImageFacility); [`bundler::HdiutilFacility`]
//! drives the macOS `hdiutil` tool.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;
pub mod project;

// Re-export commonly used types
pub use error::{CliError, PackagerError, Result};
