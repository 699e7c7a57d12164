//! Layout overrides from `dmg.toml`
//!
//! Every key is optional; anything left out keeps the drag-to-install
//! defaults from [`DmgSpec::application_layout_builder`].
//!
//! ```toml
//! format = "UDZO"
//! size = "200M"
//! icon_size = 72
//! text_size = 12
//! background = "assets/dmg-background.png"
//! window_rect = { origin = [100, 100], size = [540, 380] }
//! symlinks = { Applications = "/Applications" }
//! icon_positions = { "{app}" = [140, 160], Applications = [400, 160] }
//! ```
//!
//! `symlinks` and `icon_positions` replace the default tables when present.
//! `{app}` in an icon position key stands for the bundle's file name.

use crate::bundler::{DmgFormat, DmgSpecBuilder, IconPosition, ImageSize, WindowRect};
use crate::error::{CliError, PackagerError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Placeholder for the bundle file name in icon position keys.
pub const APP_PLACEHOLDER: &str = "{app}";

/// Parsed `dmg.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DmgConfig {
    /// Final image format
    #[serde(default)]
    pub format: Option<DmgFormat>,

    /// Image capacity, e.g. `"200M"`
    #[serde(default)]
    pub size: Option<ImageSize>,

    /// Icon size in points
    #[serde(default)]
    pub icon_size: Option<u16>,

    /// Label text size in points
    #[serde(default)]
    pub text_size: Option<u16>,

    /// Window background picture, relative to the config file
    #[serde(default)]
    pub background: Option<PathBuf>,

    /// Window geometry
    #[serde(default)]
    pub window_rect: Option<WindowRect>,

    /// Link name -> target; replaces the default `Applications` link
    #[serde(default)]
    pub symlinks: Option<BTreeMap<String, PathBuf>>,

    /// Item name -> position; replaces the default positions
    #[serde(default)]
    pub icon_positions: Option<BTreeMap<String, IconPosition>>,
}

impl DmgConfig {
    /// Parse a config document. Relative paths are resolved against `base_dir`.
    pub fn from_toml_str(contents: &str, base_dir: &Path) -> Result<Self> {
        let mut config: DmgConfig = toml::from_str(contents)?;
        if let Some(background) = config.background.take() {
            config.background = Some(if background.is_absolute() {
                background
            } else {
                base_dir.join(background)
            });
        }
        Ok(config)
    }

    /// Overlay these values on `builder`.
    ///
    /// `app_name` is substituted for [`APP_PLACEHOLDER`] in icon position keys.
    pub fn apply(&self, mut builder: DmgSpecBuilder, app_name: &str) -> DmgSpecBuilder {
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if let Some(size) = self.size {
            builder = builder.size(size);
        }
        if let Some(icon_size) = self.icon_size {
            builder = builder.icon_size(icon_size);
        }
        if let Some(text_size) = self.text_size {
            builder = builder.text_size(text_size);
        }
        if let Some(background) = &self.background {
            builder = builder.background(background);
        }
        if let Some(rect) = self.window_rect {
            builder = builder.window_rect(rect);
        }
        if let Some(symlinks) = &self.symlinks {
            builder = builder.symlinks(symlinks.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(positions) = &self.icon_positions {
            builder = builder.icon_positions(
                positions
                    .iter()
                    .map(|(name, pos)| (name.replace(APP_PLACEHOLDER, app_name), *pos)),
            );
        }
        builder
    }
}

/// Load a config file.
pub fn load_config(path: &Path) -> Result<DmgConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        PackagerError::Cli(CliError::ExecutionFailed {
            command: "read_dmg_config".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = DmgConfig::from_toml_str(&contents, base_dir)?;
    log::debug!("Loaded layout overrides from {}", path.display());
    Ok(config)
}

/// Resolve the config to use: an explicit path must exist, otherwise the
/// default location is used when present.
pub fn find_config(explicit: Option<&Path>, default_path: &Path) -> Result<Option<DmgConfig>> {
    match explicit {
        Some(path) => load_config(path).map(Some),
        None if default_path.is_file() => load_config(default_path).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::DmgSpec;

    const FULL: &str = r#"
format = "UDZO"
size = "200M"
icon_size = 72
text_size = 13
background = "assets/bg.png"
window_rect = { origin = [120, 80], size = [540, 380] }
symlinks = { Applications = "/Applications", Docs = "/Library/Docs" }
icon_positions = { "{app}" = [140, 160], Applications = [400, 160], Docs = [270, 300] }
"#;

    #[test]
    fn parses_every_key() {
        let config = DmgConfig::from_toml_str(FULL, Path::new("/repo")).unwrap();

        assert_eq!(config.format, Some(DmgFormat::Udzo));
        assert_eq!(config.size, Some(ImageSize::from_mebibytes(200)));
        assert_eq!(config.icon_size, Some(72));
        assert_eq!(config.text_size, Some(13));
        assert_eq!(config.background, Some(PathBuf::from("/repo/assets/bg.png")));
        assert_eq!(config.window_rect, Some(WindowRect::new((120, 80), (540, 380))));
        assert_eq!(config.symlinks.as_ref().map(|s| s.len()), Some(2));
    }

    #[test]
    fn empty_document_changes_nothing() {
        let app = Path::new("/repo/build/Tool.app");
        let config = DmgConfig::from_toml_str("", Path::new("/repo")).unwrap();
        let overlaid = config
            .apply(DmgSpec::application_layout_builder(app), "Tool.app")
            .build()
            .unwrap();
        assert_eq!(overlaid, DmgSpec::application_layout(app).unwrap());
    }

    #[test]
    fn overlay_expands_app_placeholder() {
        let app = Path::new("/repo/build/Tool.app");
        let config = DmgConfig::from_toml_str(FULL, Path::new("/repo")).unwrap();
        let spec = config
            .apply(DmgSpec::application_layout_builder(app), "Tool.app")
            .build()
            .unwrap();

        assert_eq!(spec.format(), DmgFormat::Udzo);
        assert_eq!(spec.icon_positions().get("Tool.app"), Some(&IconPosition::new(140, 160)));
        assert_eq!(spec.icon_positions().get("Docs"), Some(&IconPosition::new(270, 300)));
        assert!(!spec.icon_positions().contains_key("{app}"));
        assert_eq!(spec.symlinks().get("Docs"), Some(&PathBuf::from("/Library/Docs")));
    }

    #[test]
    fn empty_symlink_table_removes_applications_link() {
        let app = Path::new("/repo/build/Tool.app");
        let config = DmgConfig::from_toml_str("symlinks = {}", Path::new("/repo")).unwrap();
        let spec = config
            .apply(DmgSpec::application_layout_builder(app), "Tool.app")
            .build()
            .unwrap();
        assert!(spec.symlinks().is_empty());
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        assert!(DmgConfig::from_toml_str("colour = \"red\"", Path::new(".")).is_err());
        assert!(DmgConfig::from_toml_str("format = \"ZIP\"", Path::new(".")).is_err());
        assert!(DmgConfig::from_toml_str("size = \"lots\"", Path::new(".")).is_err());
    }

    #[test]
    fn explicit_config_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(find_config(Some(&missing), &tmp.path().join("dmg.toml")).is_err());
        assert_eq!(find_config(None, &tmp.path().join("dmg.toml")).unwrap(), None);
    }
}
