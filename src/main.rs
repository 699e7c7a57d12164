//! create_dmg - package a built macOS .app into a drag-to-install DMG.
//!
//! Exit codes distinguish a missing bundle (2) from a failed image build (3)
//! and invalid input (4) so build pipelines can react to each.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match dmg_assembler::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            dmg_assembler::error::EXIT_FAILURE
        }
    };

    process::exit(exit_code);
}
