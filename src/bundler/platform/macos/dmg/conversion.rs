//! DMG format conversion.
//!
//! Layout customization needs a writable image, so every image is created as
//! UDRW and converted to the requested format only after it is detached.
//! Changes made to a mounted read-only image live in a shadow file and are
//! discarded on detach.

use super::creation::{run_hdiutil, utf8};
use crate::bundler::{Error, error::Result, settings::DmgFormat};
use std::path::Path;

/// Convert a detached read-write image into `format` at `destination`.
///
/// `destination` must end in `.dmg`; hdiutil appends the extension otherwise.
pub async fn convert_image(
    hdiutil: &Path,
    source: &Path,
    format: DmgFormat,
    destination: &Path,
) -> Result<()> {
    log::info!("Converting DMG to {} format...", format);

    let args = conversion_args(
        utf8(source, "image path")?,
        format,
        utf8(destination, "converted image path")?,
    );
    run_hdiutil(hdiutil, &args).await?;

    if !destination.is_file() {
        return Err(Error::AssemblyFailure(format!(
            "hdiutil convert reported success but {} was not created",
            destination.display()
        )));
    }

    log::info!("✓ DMG converted to {} format", format);
    Ok(())
}

fn conversion_args<'a>(source: &'a str, format: DmgFormat, destination: &'a str) -> Vec<&'a str> {
    let mut args = vec!["convert", source, "-format", format.as_str()];
    if format == DmgFormat::Udzo {
        args.extend(["-imagekey", "zlib-level=9"]);
    }
    args.extend(["-o", destination, "-ov"]);
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_requested_format() {
        assert_eq!(
            conversion_args("rw.dmg", DmgFormat::Udbz, "out.dmg"),
            ["convert", "rw.dmg", "-format", "UDBZ", "-o", "out.dmg", "-ov"]
        );
    }

    #[test]
    fn zlib_images_use_maximum_compression() {
        let args = conversion_args("rw.dmg", DmgFormat::Udzo, "out.dmg");
        assert!(args.windows(2).any(|w| w == ["-imagekey", "zlib-level=9"]));
    }
}
