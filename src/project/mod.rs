//! Project layout resolution
//!
//! The packager works on a checkout where the app has already been built
//! into `<root>/build/<Name>.app`. The image is written next to it as
//! `<root>/build/<Name>.dmg` unless another output is given.

use crate::error::{CliError, PackagerError, Result};
use std::path::{Path, PathBuf};

/// Project name used when none is supplied.
pub const DEFAULT_PROJECT_NAME: &str = "VideoDownloader";

/// Directory under the project root holding build products.
pub const BUILD_DIR: &str = "build";

/// Layout override file looked up at the project root.
pub const CONFIG_FILE_NAME: &str = "dmg.toml";

/// Where the bundle lives and where the image goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    name: String,
    output: Option<PathBuf>,
    volume_name: Option<String>,
}

impl ProjectLayout {
    /// Layout for project `name` rooted at `root`.
    pub fn new<P: Into<PathBuf>, S: Into<String>>(root: P, name: S) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PackagerError::Cli(CliError::InvalidArguments {
                reason: "Project name cannot be empty".to_string(),
            }));
        }
        if name.contains('/') {
            return Err(PackagerError::Cli(CliError::InvalidArguments {
                reason: format!("Project name cannot contain '/': {name}"),
            }));
        }

        Ok(Self {
            root: root.into(),
            name,
            output: None,
            volume_name: None,
        })
    }

    /// Write the image to `path` instead of `build/<Name>.dmg`.
    pub fn with_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Label the volume `name` instead of the project name.
    pub fn with_volume_name<S: Into<String>>(mut self, name: S) -> Self {
        self.volume_name = Some(name.into());
        self
    }

    /// Project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<root>/build`
    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    /// `<root>/build/<Name>.app`
    pub fn app_path(&self) -> PathBuf {
        self.build_dir().join(format!("{}.app", self.name))
    }

    /// Output image path.
    pub fn dmg_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.build_dir().join(format!("{}.dmg", self.name)))
    }

    /// Label of the mounted volume.
    pub fn volume_name(&self) -> &str {
        self.volume_name.as_deref().unwrap_or(&self.name)
    }

    /// `<root>/dmg.toml`
    pub fn default_config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }
}

/// Find the top of the git working tree containing `start`.
///
/// Runs `git rev-parse --show-toplevel`, matching what build scripts in the
/// checkout see.
pub async fn discover_root(start: &Path) -> Result<PathBuf> {
    let output = tokio::process::Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(start)
        .output()
        .await
        .map_err(|e| {
            PackagerError::Cli(CliError::ExecutionFailed {
                command: "git rev-parse --show-toplevel".to_string(),
                reason: format!("Failed to run git: {}", e),
            })
        })?;

    if !output.status.success() {
        return Err(PackagerError::Cli(CliError::ExecutionFailed {
            command: "git rev-parse --show-toplevel".to_string(),
            reason: format!(
                "{} is not inside a git repository: {}",
                start.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }));
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    log::debug!("Project root: {}", root);
    Ok(PathBuf::from(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventional_paths() {
        let layout = ProjectLayout::new("/work/repo", "VideoDownloader").unwrap();
        assert_eq!(layout.app_path(), Path::new("/work/repo/build/VideoDownloader.app"));
        assert_eq!(layout.dmg_path(), Path::new("/work/repo/build/VideoDownloader.dmg"));
        assert_eq!(layout.volume_name(), "VideoDownloader");
        assert_eq!(layout.default_config_path(), Path::new("/work/repo/dmg.toml"));
    }

    #[test]
    fn overrides_output_and_volume() {
        let layout = ProjectLayout::new("/work/repo", "Tool")
            .unwrap()
            .with_output("/dist/Tool-1.0.dmg")
            .with_volume_name("Tool Installer");
        assert_eq!(layout.dmg_path(), Path::new("/dist/Tool-1.0.dmg"));
        assert_eq!(layout.volume_name(), "Tool Installer");
        assert_eq!(layout.app_path(), Path::new("/work/repo/build/Tool.app"));
    }

    #[test]
    fn rejects_bad_names() {
        assert!(ProjectLayout::new("/r", "").is_err());
        assert!(ProjectLayout::new("/r", "a/b").is_err());
    }

    #[tokio::test]
    async fn discovers_repository_root_from_subdirectory() {
        if which::which("git").is_err() {
            return;
        }
        let tmp = tempfile::tempdir().unwrap();
        let status = std::process::Command::new("git")
            .args(["init", "-q"])
            .current_dir(tmp.path())
            .status()
            .unwrap();
        assert!(status.success());
        let nested = tmp.path().join("build/deep");
        std::fs::create_dir_all(&nested).unwrap();

        let root = discover_root(&nested).await.unwrap();

        assert_eq!(
            root.canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }
}
