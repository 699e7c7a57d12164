//! Command line argument parsing and validation.
//!
//! Every argument is optional: with none, the project root comes from git,
//! the project name from `DMG_PROJECT_NAME` or the built-in default, and the
//! layout from `dmg.toml` or the drag-to-install defaults.

use crate::project::DEFAULT_PROJECT_NAME;
use clap::Parser;
use std::path::PathBuf;

/// Package a built macOS .app into a drag-to-install DMG
#[derive(Parser, Debug)]
#[command(
    name = "create_dmg",
    version,
    about = "Package a built macOS .app into a drag-to-install DMG",
    long_about = "Wraps <root>/build/<Name>.app into <root>/build/<Name>.dmg with an Applications
shortcut and a fixed Finder window layout. <root> defaults to the top of the
current git checkout.

Usage:
  create_dmg
  create_dmg --project-name MyApp
  create_dmg --root ~/src/myapp --config packaging/dmg.toml --output dist/MyApp-1.0.dmg

Exit codes: 0 created, 1 other error, 2 bundle missing, 3 image build failed,
4 invalid arguments or layout."
)]
pub struct Args {
    /// Project name; the bundle is build/<NAME>.app
    #[arg(
        short = 'n',
        long,
        value_name = "NAME",
        env = "DMG_PROJECT_NAME",
        default_value = DEFAULT_PROJECT_NAME
    )]
    pub project_name: String,

    /// Project root (default: top of the current git checkout)
    #[arg(short = 'r', long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Layout overrides (default: <root>/dmg.toml when present)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output image path (default: <root>/build/<NAME>.dmg)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Volume label shown when mounted (default: project name)
    #[arg(long, value_name = "LABEL")]
    pub volume_name: Option<String>,

    /// Print extra detail
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the artifact report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Parse command line arguments
    ///
    /// Returns clap's error instead of exiting.
    pub fn parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.project_name.trim().is_empty() {
            return Err("Project name cannot be empty".to_string());
        }

        if let Some(output) = &self.output {
            if output.extension().is_none_or(|ext| ext != "dmg") {
                return Err(format!(
                    "Output path must end in .dmg: {}",
                    output.display()
                ));
            }
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        // JSON reports own stdout; human-readable lines would corrupt them.
        let output = super::OutputManager::new(args.verbose, args.quiet || args.json);

        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print error message (always shown)
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.output.error(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
