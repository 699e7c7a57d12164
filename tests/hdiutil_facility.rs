//! `HdiutilFacility` driven by stand-in `hdiutil` and `osascript` scripts.
//!
//! The stand-ins log every invocation and create the files the real tools
//! would, so the mount, layout, detach and convert sequence runs on any
//! Unix host.
#![cfg(unix)]

use dmg_assembler::bundler::{DmgSpec, Error, HdiutilFacility, assemble};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

const ATTACH_MOUNTED: &str = r#"mkdir -p '@MOUNT@'
    printf '/dev/disk9\tGUID_partition_scheme\t\n/dev/disk9s1\tApple_HFS\t%s\n' '@MOUNT@'"#;
const ATTACH_SILENT: &str = r#"printf '/dev/disk9\tGUID_partition_scheme\t\n'"#;
const DETACH_OK: &str = "exit 0";
const DETACH_BUSY: &str = r#"case "$*" in
      *-force*) exit 0 ;;
      *) echo "hdiutil: couldn't unmount disk9 - Resource busy" >&2; exit 16 ;;
    esac"#;

const HDIUTIL: &str = r#"#!/bin/sh
echo "$*" >> '@LOG@'
case "$1" in
  create)
    for arg in "$@"; do last="$arg"; done
    : > "$last"
    ;;
  attach)
    @ATTACH@
    ;;
  detach)
    @DETACH@
    ;;
  convert)
    while [ $# -gt 0 ]; do
      if [ "$1" = "-o" ]; then printf 'converted image' > "$2"; fi
      shift
    done
    ;;
esac
"#;

const OSASCRIPT_OK: &str = r#"#!/bin/sh
printf '%s' "$2" > '@SCRIPT@'
"#;
const OSASCRIPT_NO_FINDER: &str = r#"#!/bin/sh
echo "execution error: Finder got an error: Can't get disk \"Fixture\". (-1728)" >&2
exit 1
"#;

struct Workspace {
    dir: TempDir,
    app: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("Fixture.app");
        std::fs::create_dir_all(app.join("Contents/MacOS")).unwrap();
        std::fs::write(app.join("Contents/MacOS/Fixture"), b"binary").unwrap();
        std::fs::create_dir_all(dir.path().join("out")).unwrap();
        Self { dir, app }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn output(&self) -> PathBuf {
        self.path("out/Fixture.dmg")
    }

    fn mount_point(&self) -> PathBuf {
        self.path("mnt/Fixture")
    }

    fn hdiutil(&self, attach: &str, detach: &str) -> PathBuf {
        let body = HDIUTIL
            .replace("@ATTACH@", attach)
            .replace("@DETACH@", detach)
            .replace("@MOUNT@", self.mount_point().to_str().unwrap())
            .replace("@LOG@", self.path("hdiutil.log").to_str().unwrap());
        self.tool("hdiutil", &body)
    }

    fn osascript(&self, template: &str) -> PathBuf {
        let script = self.path("layout.applescript");
        let body = template.replace("@SCRIPT@", script.to_str().unwrap());
        self.tool("osascript", &body)
    }

    fn tool(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path(&format!("bin/{name}"));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn hdiutil_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.path("hdiutil.log"))
            .map(|log| log.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    async fn assemble(&self, facility: &HdiutilFacility) -> dmg_assembler::bundler::Result<()> {
        let spec = DmgSpec::application_layout(&self.app).unwrap();
        assemble(&self.output(), "Fixture", &spec, facility).await
    }
}

fn subcommands(calls: &[String]) -> Vec<&str> {
    calls
        .iter()
        .filter_map(|call| call.split_whitespace().next())
        .collect()
}

fn facility(hdiutil: PathBuf, osascript: PathBuf) -> HdiutilFacility {
    HdiutilFacility::with_tools(Some(hdiutil), Some(osascript))
}

#[tokio::test]
async fn applies_layout_then_converts_into_place() {
    let ws = Workspace::new();
    let facility = facility(
        ws.hdiutil(ATTACH_MOUNTED, DETACH_OK),
        ws.osascript(OSASCRIPT_OK),
    );

    ws.assemble(&facility).await.unwrap();

    assert_eq!(std::fs::read(ws.output()).unwrap(), b"converted image");
    let calls = ws.hdiutil_calls();
    assert_eq!(subcommands(&calls), ["create", "attach", "detach", "convert"]);
    assert!(calls[1].contains("-readwrite"));
    assert!(calls[2].ends_with(ws.mount_point().to_str().unwrap()));
    assert!(calls[3].contains("-format UDBZ"));

    let script = std::fs::read_to_string(ws.path("layout.applescript")).unwrap();
    assert!(script.contains(r#"tell disk "Fixture""#));
    assert!(script.contains("set bounds of container window to {100, 100, 500, 300}"));
    assert!(script.contains("set icon size of viewOptions to 64"));
    assert!(script.contains("set text size of viewOptions to 12"));
    assert!(script.contains(r#"set position of item "Fixture.app" to {100, 100}"#));
    assert!(script.contains(r#"set position of item "Applications" to {300, 100}"#));
}

#[tokio::test]
async fn layout_script_failure_is_assembly_failure() {
    let ws = Workspace::new();
    let facility = facility(
        ws.hdiutil(ATTACH_MOUNTED, DETACH_OK),
        ws.osascript(OSASCRIPT_NO_FINDER),
    );

    let err = ws.assemble(&facility).await.unwrap_err();

    match err {
        Error::AssemblyFailure(msg) => assert!(msg.contains("Can't get disk"), "{msg}"),
        other => panic!("expected AssemblyFailure, got {other:?}"),
    }
    assert!(!ws.output().exists());
    // Still detached, never converted.
    assert_eq!(subcommands(&ws.hdiutil_calls()), ["create", "attach", "detach"]);
}

#[tokio::test]
async fn missing_osascript_fails_before_hdiutil_runs() {
    let ws = Workspace::new();
    let hdiutil = ws.hdiutil(ATTACH_MOUNTED, DETACH_OK);
    let facility = HdiutilFacility::with_tools(Some(hdiutil), None);

    let err = ws.assemble(&facility).await.unwrap_err();

    match err {
        Error::AssemblyFailure(msg) => assert!(msg.contains("osascript not found"), "{msg}"),
        other => panic!("expected AssemblyFailure, got {other:?}"),
    }
    assert!(ws.hdiutil_calls().is_empty());
    assert!(!ws.output().exists());
}

#[tokio::test]
async fn busy_volume_is_force_detached() {
    let ws = Workspace::new();
    let facility = facility(
        ws.hdiutil(ATTACH_MOUNTED, DETACH_BUSY),
        ws.osascript(OSASCRIPT_OK),
    );

    ws.assemble(&facility).await.unwrap();

    let calls = ws.hdiutil_calls();
    assert_eq!(
        subcommands(&calls),
        ["create", "attach", "detach", "detach", "convert"]
    );
    assert!(!calls[2].ends_with("-force"));
    assert!(calls[3].ends_with("-force"));
    assert!(ws.output().is_file());
}

#[tokio::test]
async fn unreported_mount_point_falls_back_to_volumes() {
    let ws = Workspace::new();
    let facility = facility(
        ws.hdiutil(ATTACH_SILENT, DETACH_OK),
        ws.osascript(OSASCRIPT_OK),
    );

    let err = ws.assemble(&facility).await.unwrap_err();

    match err {
        Error::AssemblyFailure(msg) => assert!(msg.contains("/Volumes/Fixture not found"), "{msg}"),
        other => panic!("expected AssemblyFailure, got {other:?}"),
    }
    assert!(!ws.path("layout.applescript").exists());
    assert!(!ws.output().exists());
}
