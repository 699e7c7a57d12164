//! Configuration structures for disk image assembly.
//!
//! [`DmgSpec`] is the immutable description of an image: what goes at its
//! root, how it is compressed and how its Finder window is laid out.
//! [`DmgSpecBuilder`] validates and constructs it.

mod builder;
mod dmg;
mod format;

// Re-export all public types
pub use builder::DmgSpecBuilder;
pub use dmg::{DmgSpec, IconPosition, WindowRect};
pub use format::{DmgFormat, ImageSize};
