//! Builder for constructing DmgSpec.

use super::{DmgFormat, DmgSpec, IconPosition, ImageSize, WindowRect};
use crate::bundler::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Builder for constructing [`DmgSpec`].
///
/// Unset values fall back to a UDZO image of 100M with a 400x200 window,
/// 64pt icons and 12pt labels. At least one source path is required.
///
/// # See Also
///
/// - [`DmgSpec::application_layout_builder`] - builder pre-populated for a single .app
#[derive(Clone, Debug, Default)]
pub struct DmgSpecBuilder {
    format: Option<DmgFormat>,
    size: Option<ImageSize>,
    source_paths: Vec<PathBuf>,
    symlinks: BTreeMap<String, PathBuf>,
    icon_positions: BTreeMap<String, IconPosition>,
    window_rect: Option<WindowRect>,
    icon_size: Option<u16>,
    text_size: Option<u16>,
    background: Option<PathBuf>,
}

impl DmgSpecBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the final image format.
    pub fn format(mut self, format: DmgFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the image capacity.
    pub fn size(mut self, size: ImageSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Appends a path to place at the image root.
    pub fn source_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the list of source paths.
    pub fn source_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.source_paths = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        self
    }

    /// Adds (or replaces) a symbolic link at the image root.
    pub fn symlink<N: Into<String>, T: AsRef<Path>>(mut self, name: N, target: T) -> Self {
        self.symlinks
            .insert(name.into(), target.as_ref().to_path_buf());
        self
    }

    /// Replaces the symbolic link table.
    pub fn symlinks<I, N, T>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: AsRef<Path>,
    {
        self.symlinks = links
            .into_iter()
            .map(|(name, target)| (name.into(), target.as_ref().to_path_buf()))
            .collect();
        self
    }

    /// Places the named item at `position` in the icon view.
    pub fn icon_position<N: Into<String>, P: Into<IconPosition>>(
        mut self,
        name: N,
        position: P,
    ) -> Self {
        self.icon_positions.insert(name.into(), position.into());
        self
    }

    /// Replaces the icon position table.
    pub fn icon_positions<I, N, P>(mut self, positions: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<IconPosition>,
    {
        self.icon_positions = positions
            .into_iter()
            .map(|(name, pos)| (name.into(), pos.into()))
            .collect();
        self
    }

    /// Sets the window geometry.
    pub fn window_rect(mut self, rect: WindowRect) -> Self {
        self.window_rect = Some(rect);
        self
    }

    /// Sets the icon size in points.
    pub fn icon_size(mut self, size: u16) -> Self {
        self.icon_size = Some(size);
        self
    }

    /// Sets the label text size in points.
    pub fn text_size(mut self, size: u16) -> Self {
        self.text_size = Some(size);
        self
    }

    /// Sets the window background picture.
    pub fn background<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.background = Some(path.as_ref().to_path_buf());
        self
    }

    /// Validates the collected values and builds the [`DmgSpec`].
    ///
    /// Only invariants that can be checked without touching the filesystem
    /// are enforced here; source existence is checked at assembly time.
    pub fn build(self) -> Result<DmgSpec> {
        if self.source_paths.is_empty() {
            return Err(Error::InvalidSpec(
                "at least one source path is required".into(),
            ));
        }

        let icon_size = self.icon_size.unwrap_or(DmgSpec::DEFAULT_ICON_SIZE);
        let text_size = self.text_size.unwrap_or(DmgSpec::DEFAULT_TEXT_SIZE);
        if icon_size == 0 || text_size == 0 {
            return Err(Error::InvalidSpec(
                "icon_size and text_size must be positive".into(),
            ));
        }

        let window_rect = self.window_rect.unwrap_or(DmgSpec::DEFAULT_WINDOW);
        if window_rect.size.0 == 0 || window_rect.size.1 == 0 {
            return Err(Error::InvalidSpec(
                "window size must be non-zero in both dimensions".into(),
            ));
        }

        let mut root_names = BTreeSet::new();
        for path in &self.source_paths {
            let name = path.file_name().ok_or_else(|| {
                Error::InvalidSpec(format!(
                    "source path has no file name: {}",
                    path.display()
                ))
            })?;
            if !root_names.insert(name.to_string_lossy().into_owned()) {
                return Err(Error::InvalidSpec(format!(
                    "duplicate entry at image root: {}",
                    name.to_string_lossy()
                )));
            }
        }
        for name in self.symlinks.keys() {
            if name.is_empty() || name.contains('/') || name == "." || name == ".." {
                return Err(Error::InvalidSpec(format!("invalid symlink name {name:?}")));
            }
            if !root_names.insert(name.clone()) {
                return Err(Error::InvalidSpec(format!(
                    "symlink {name:?} collides with a source entry"
                )));
            }
        }

        for name in self.icon_positions.keys() {
            if !root_names.contains(name) {
                log::debug!("Icon position given for {name:?}, which is not in the image");
            }
        }

        Ok(DmgSpec {
            format: self.format.unwrap_or(DmgFormat::Udzo),
            size: self.size.unwrap_or(DmgSpec::DEFAULT_SIZE),
            source_paths: self.source_paths,
            symlinks: self.symlinks,
            icon_positions: self.icon_positions,
            window_rect,
            icon_size,
            text_size,
            background: self.background,
        })
    }
}
