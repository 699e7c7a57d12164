//! DMG appearance customization using AppleScript.
//!
//! Handles the Finder window layout:
//! - Mounting the read-write image
//! - Running AppleScript to set view options and icon positions
//! - Detaching the image so the .DS_Store is flushed

use super::creation::{BACKGROUND_DIR, run_hdiutil, utf8};
use crate::bundler::{
    Error,
    error::{Context, Result},
    settings::DmgSpec,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::time::Duration;

/// Apply the window layout from `spec` to a read-write image.
///
/// # Process
/// 1. Mount the image read-write
/// 2. Run AppleScript to configure the Finder window
/// 3. Wait for .DS_Store to be written, then detach
///
/// The image is detached even when the script fails; the script error is
/// then returned as [`Error::AssemblyFailure`].
pub async fn apply_layout(
    hdiutil: &Path,
    osascript: &Path,
    image: &Path,
    volume_name: &str,
    spec: &DmgSpec,
) -> Result<()> {
    log::info!("Applying DMG window layout...");

    let mount_point = mount_rw(hdiutil, image, volume_name).await?;

    // Finder addresses the disk by the mounted name, which gains a suffix
    // when another volume with the same label is already mounted.
    let disk_name = mount_point
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| volume_name.to_string());

    let script = layout_script(&disk_name, spec);
    let script_result = run_applescript(osascript, &script).await;

    detach(hdiutil, &mount_point).await?;

    script_result.map_err(|e| {
        Error::AssemblyFailure(format!("applying window layout to {:?}: {}", disk_name, e))
    })?;

    log::info!("✓ DMG window layout applied");
    Ok(())
}

/// Mount a read-write image and return its mount point.
async fn mount_rw(hdiutil: &Path, image: &Path, volume_name: &str) -> Result<PathBuf> {
    log::debug!("Mounting DMG for customization...");

    let output = run_hdiutil(
        hdiutil,
        &[
            "attach",
            utf8(image, "image path")?,
            "-readwrite",
            "-noverify",
            "-noautoopen",
            "-nobrowse",
        ],
    )
    .await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mount_point = parse_mount_point(&stdout)
        .unwrap_or_else(|| PathBuf::from(format!("/Volumes/{}", volume_name)));

    // Wait for mount to be ready
    let max_retries = 10;
    for _ in 0..max_retries {
        if mount_point.exists() {
            log::debug!("DMG mounted at {}", mount_point.display());
            return Ok(mount_point);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Err(Error::AssemblyFailure(format!(
        "DMG mount point {} not found after {} retries",
        mount_point.display(),
        max_retries
    )))
}

/// Extract the mount point from `hdiutil attach` output.
///
/// Each line is `<device>\t<partition type>\t<mount point>`; only the line
/// for the mounted filesystem has a non-empty third column. The mount point
/// is usually under `/Volumes` but `-mountroot` can put it anywhere.
fn parse_mount_point(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .filter_map(|line| line.splitn(3, '\t').nth(2))
        .map(str::trim)
        .find(|field| field.starts_with('/'))
        .map(PathBuf::from)
}

/// Escape special characters for AppleScript string literals
///
/// Escapes backslashes and double quotes to prevent script injection
/// and syntax errors when names contain special characters.
fn escape_applescript_string(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', r#"\""#)
}

/// Build the Finder script that lays out the window for `spec`.
pub fn layout_script(disk_name: &str, spec: &DmgSpec) -> String {
    let (left, top, right, bottom) = spec.window_rect().bounds();

    let background_clause = spec
        .background()
        .and_then(|p| p.file_name())
        .map(|name| {
            format!(
                "set background picture of viewOptions to file \"{}:{}\"\n",
                BACKGROUND_DIR,
                escape_applescript_string(&name.to_string_lossy())
            )
        })
        .unwrap_or_default();

    // Finder aborts the whole script on an unknown item.
    let entries: BTreeSet<String> = spec.root_entries().collect();
    let positions: String = spec
        .icon_positions()
        .iter()
        .filter(|(name, _)| entries.contains(*name))
        .map(|(name, pos)| {
            format!(
                "set position of item \"{}\" to {{{}, {}}}\n",
                escape_applescript_string(name),
                pos.x,
                pos.y
            )
        })
        .collect();

    format!(
        r#"tell application "Finder"
tell disk "{disk}"
open
set current view of container window to icon view
set toolbar visible of container window to false
set statusbar visible of container window to false
set bounds of container window to {{{left}, {top}, {right}, {bottom}}}
set viewOptions to icon view options of container window
set arrangement of viewOptions to not arranged
set icon size of viewOptions to {icon_size}
set text size of viewOptions to {text_size}
{background_clause}{positions}close
open
update without registering applications
delay 2
end tell
end tell
"#,
        disk = escape_applescript_string(disk_name),
        icon_size = spec.icon_size(),
        text_size = spec.text_size(),
    )
}

async fn run_applescript(osascript: &Path, script: &str) -> Result<()> {
    log::debug!("Running AppleScript to customize DMG window...");

    let output = tokio::process::Command::new(osascript)
        .arg("-e")
        .arg(script)
        .output()
        .await
        .context("running osascript")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GenericError(stderr.trim().to_string()));
    }

    Ok(())
}

/// Detach (unmount) the image, forcing if the first attempt fails.
async fn detach(hdiutil: &Path, mount_point: &Path) -> Result<()> {
    log::debug!("Detaching DMG...");

    // Wait for .DS_Store to be written
    tokio::time::sleep(Duration::from_secs(2)).await;

    let mount_str = utf8(mount_point, "mount point")?;
    if let Err(e) = run_hdiutil(hdiutil, &["detach", mount_str]).await {
        log::warn!("DMG detach had issues: {}", e);
        run_hdiutil(hdiutil, &["detach", mount_str, "-force"]).await?;
    }

    Ok(())
}
