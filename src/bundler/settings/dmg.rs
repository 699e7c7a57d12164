//! Disk image layout configuration.

use super::{DmgFormat, DmgSpecBuilder, ImageSize};
use crate::bundler::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Position of an item in the mounted window's icon view, in points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct IconPosition {
    /// Horizontal offset from the left edge of the icon view
    pub x: i32,
    /// Vertical offset from the top edge of the icon view
    pub y: i32,
}

impl IconPosition {
    /// Creates a new position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for IconPosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<IconPosition> for (i32, i32) {
    fn from(pos: IconPosition) -> Self {
        (pos.x, pos.y)
    }
}

/// Finder window geometry shown when the image is mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub struct WindowRect {
    /// Top-left corner of the window on screen `(x, y)`
    pub origin: (i32, i32),
    /// Window content size `(width, height)`
    pub size: (u32, u32),
}

impl WindowRect {
    /// Creates a new window rectangle.
    pub const fn new(origin: (i32, i32), size: (u32, u32)) -> Self {
        Self { origin, size }
    }

    /// Finder `bounds` value: `{left, top, right, bottom}`.
    pub fn bounds(&self) -> (i64, i64, i64, i64) {
        let (x, y) = (i64::from(self.origin.0), i64::from(self.origin.1));
        (
            x,
            y,
            x + i64::from(self.size.0),
            y + i64::from(self.size.1),
        )
    }
}

/// Declarative description of a disk image.
///
/// Built once through [`DmgSpecBuilder`], consumed by
/// [`assemble`](crate::bundler::platform::macos::dmg::assemble) and then
/// discarded. All fields are immutable after construction.
///
/// # Examples
///
/// ```no_run
/// use dmg_assembler::bundler::{DmgFormat, DmgSpec};
///
/// # fn example() -> dmg_assembler::bundler::Result<()> {
/// let spec = DmgSpec::builder()
///     .format(DmgFormat::Udzo)
///     .size("100M".parse()?)
///     .source_path("build/MyApp.app")
///     .symlink("Applications", "/Applications")
///     .icon_position("MyApp.app", (100, 100))
///     .icon_position("Applications", (300, 100))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DmgSpec {
    pub(super) format: DmgFormat,
    pub(super) size: ImageSize,
    pub(super) source_paths: Vec<PathBuf>,
    pub(super) symlinks: BTreeMap<String, PathBuf>,
    pub(super) icon_positions: BTreeMap<String, IconPosition>,
    pub(super) window_rect: WindowRect,
    pub(super) icon_size: u16,
    pub(super) text_size: u16,
    pub(super) background: Option<PathBuf>,
}

impl DmgSpec {
    /// Default image capacity.
    pub const DEFAULT_SIZE: ImageSize = ImageSize::from_mebibytes(100);
    /// Default window geometry.
    pub const DEFAULT_WINDOW: WindowRect = WindowRect::new((100, 100), (400, 200));
    /// Default icon size in points.
    pub const DEFAULT_ICON_SIZE: u16 = 64;
    /// Default label text size in points.
    pub const DEFAULT_TEXT_SIZE: u16 = 12;
    /// Name of the drag-to-install shortcut.
    pub const APPLICATIONS_LINK: &'static str = "Applications";

    /// Starts building a spec.
    pub fn builder() -> DmgSpecBuilder {
        DmgSpecBuilder::new()
    }

    /// Drag-to-install layout for a single application bundle.
    ///
    /// The bundle sits at `(100, 100)` and an `Applications` shortcut at
    /// `(300, 100)` in a 400x200 bzip2-compressed window.
    pub fn application_layout(app_bundle: &Path) -> Result<Self> {
        Self::application_layout_builder(app_bundle).build()
    }

    /// Builder pre-populated with [`DmgSpec::application_layout`] values, for
    /// callers that want to override part of the layout.
    pub fn application_layout_builder(app_bundle: &Path) -> DmgSpecBuilder {
        let app_name = app_bundle
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        DmgSpec::builder()
            .format(DmgFormat::Udbz)
            .size(Self::DEFAULT_SIZE)
            .source_path(app_bundle)
            .symlink(Self::APPLICATIONS_LINK, "/Applications")
            .icon_position(app_name, (100, 100))
            .icon_position(Self::APPLICATIONS_LINK, (300, 100))
            .window_rect(Self::DEFAULT_WINDOW)
            .icon_size(Self::DEFAULT_ICON_SIZE)
            .text_size(Self::DEFAULT_TEXT_SIZE)
    }

    /// Compression scheme of the final image.
    pub fn format(&self) -> DmgFormat {
        self.format
    }

    /// Maximum capacity of the image.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Paths placed at the image root, in order.
    pub fn source_paths(&self) -> &[PathBuf] {
        &self.source_paths
    }

    /// Link name -> link target.
    pub fn symlinks(&self) -> &BTreeMap<String, PathBuf> {
        &self.symlinks
    }

    /// Item name -> icon view position.
    pub fn icon_positions(&self) -> &BTreeMap<String, IconPosition> {
        &self.icon_positions
    }

    /// Window geometry shown on mount.
    pub fn window_rect(&self) -> WindowRect {
        self.window_rect
    }

    /// Icon size in points.
    pub fn icon_size(&self) -> u16 {
        self.icon_size
    }

    /// Label text size in points.
    pub fn text_size(&self) -> u16 {
        self.text_size
    }

    /// Optional background picture for the window.
    pub fn background(&self) -> Option<&Path> {
        self.background.as_deref()
    }

    /// Names of the items that will appear at the image root.
    pub fn root_entries(&self) -> impl Iterator<Item = String> + '_ {
        self.source_paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .chain(self.symlinks.keys().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_layout_matches_drag_to_install_defaults() {
        let app = Path::new("/tmp/build/VideoDownloader.app");
        let spec = DmgSpec::application_layout(app).unwrap();

        assert_eq!(spec.format(), DmgFormat::Udbz);
        assert_eq!(spec.size().bytes(), 100 * 1024 * 1024);
        assert_eq!(spec.source_paths(), [PathBuf::from("/tmp/build/VideoDownloader.app")]);
        assert_eq!(
            spec.symlinks().get("Applications"),
            Some(&PathBuf::from("/Applications"))
        );
        assert_eq!(
            spec.icon_positions().get("VideoDownloader.app"),
            Some(&IconPosition::new(100, 100))
        );
        assert_eq!(
            spec.icon_positions().get("Applications"),
            Some(&IconPosition::new(300, 100))
        );
        assert_eq!(spec.window_rect(), WindowRect::new((100, 100), (400, 200)));
        assert_eq!(spec.icon_size(), 64);
        assert_eq!(spec.text_size(), 12);
        assert_eq!(spec.background(), None);
    }

    #[test]
    fn constructing_twice_yields_equal_values() {
        let app = Path::new("/tmp/Fixture.app");
        assert_eq!(
            DmgSpec::application_layout(app).unwrap(),
            DmgSpec::application_layout(app).unwrap()
        );
    }

    #[test]
    fn window_bounds_are_origin_plus_size() {
        assert_eq!(
            WindowRect::new((100, 100), (400, 200)).bounds(),
            (100, 100, 500, 300)
        );
    }

    #[test]
    fn root_entries_list_sources_then_links() {
        let spec = DmgSpec::application_layout(Path::new("/x/Tool.app")).unwrap();
        let entries: Vec<_> = spec.root_entries().collect();
        assert_eq!(entries, ["Tool.app", "Applications"]);
    }
}
