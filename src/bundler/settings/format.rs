//! Image format and capacity values understood by `hdiutil`.

use crate::bundler::Error;
use std::{fmt, str::FromStr};

/// Disk image container format.
///
/// Names match the `-format` argument of `hdiutil create` / `hdiutil convert`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum DmgFormat {
    /// Read-write, uncompressed
    Udrw,
    /// Read-only, uncompressed
    Udro,
    /// ADC compressed (legacy)
    Udco,
    /// zlib compressed
    Udzo,
    /// bzip2 compressed
    Udbz,
    /// LZFSE compressed (macOS 10.11+)
    Ulfo,
    /// LZMA compressed (macOS 10.15+)
    Ulmo,
}

impl DmgFormat {
    /// All formats accepted by the assembler.
    pub const ALL: [DmgFormat; 7] = [
        DmgFormat::Udrw,
        DmgFormat::Udro,
        DmgFormat::Udco,
        DmgFormat::Udzo,
        DmgFormat::Udbz,
        DmgFormat::Ulfo,
        DmgFormat::Ulmo,
    ];

    /// The `hdiutil -format` identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            DmgFormat::Udrw => "UDRW",
            DmgFormat::Udro => "UDRO",
            DmgFormat::Udco => "UDCO",
            DmgFormat::Udzo => "UDZO",
            DmgFormat::Udbz => "UDBZ",
            DmgFormat::Ulfo => "ULFO",
            DmgFormat::Ulmo => "ULMO",
        }
    }
}

impl fmt::Display for DmgFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DmgFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DmgFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let valid: Vec<_> = DmgFormat::ALL.iter().map(|f| f.as_str()).collect();
                Error::InvalidSpec(format!(
                    "unsupported image format {s:?}. Valid formats: {}",
                    valid.join(", ")
                ))
            })
    }
}

impl TryFrom<String> for DmgFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DmgFormat> for String {
    fn from(format: DmgFormat) -> Self {
        format.as_str().to_string()
    }
}

/// Maximum capacity of the image, in bytes.
///
/// Parsed from `mkfile(8)` style strings such as `"100M"` or `"1.5g"`.
/// Multiples are binary (`1k` = 1024 bytes).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ImageSize(u64);

impl ImageSize {
    /// Capacity from an exact byte count.
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Capacity of `n` mebibytes.
    pub const fn from_mebibytes(n: u64) -> Self {
        Self(n * 1024 * 1024)
    }

    /// Capacity in bytes.
    pub fn bytes(self) -> u64 {
        self.0
    }

    /// Argument for `hdiutil create -size`.
    ///
    /// hdiutil reads a bare `b` suffix as 512-byte sectors, so the value is
    /// always expressed in whole kilobytes, rounded up.
    pub fn to_hdiutil_arg(self) -> String {
        format!("{}k", self.0.div_ceil(1024))
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [(u64, &str); 4] = [
            (1 << 40, "T"),
            (1 << 30, "G"),
            (1 << 20, "M"),
            (1 << 10, "K"),
        ];
        for (scale, suffix) in UNITS {
            if self.0 >= scale && self.0 % scale == 0 {
                return write!(f, "{}{}", self.0 / scale, suffix);
            }
        }
        write!(f, "{}", self.0)
    }
}

impl FromStr for ImageSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidSpec(format!("invalid image size {s:?}"));

        let trimmed = s.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let without_b = lowered.strip_suffix('b').unwrap_or(&lowered);

        let (number, multiplier) = match without_b.chars().last() {
            Some('k') => (&without_b[..without_b.len() - 1], 1u64 << 10),
            Some('m') => (&without_b[..without_b.len() - 1], 1u64 << 20),
            Some('g') => (&without_b[..without_b.len() - 1], 1u64 << 30),
            Some('t') => (&without_b[..without_b.len() - 1], 1u64 << 40),
            Some(_) => (without_b, 1),
            None => return Err(invalid()),
        };

        let number = number.trim();
        let bytes = if let Ok(whole) = number.parse::<u64>() {
            whole.checked_mul(multiplier).ok_or_else(invalid)?
        } else {
            let fractional: f64 = number.parse().map_err(|_| invalid())?;
            if !fractional.is_finite() || fractional < 0.0 {
                return Err(invalid());
            }
            let scaled = (fractional * multiplier as f64).ceil();
            if scaled >= u64::MAX as f64 {
                return Err(invalid());
            }
            scaled as u64
        };

        if bytes == 0 {
            return Err(Error::InvalidSpec("image size must be greater than zero".into()));
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for ImageSize {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ImageSize> for String {
    fn from(size: ImageSize) -> Self {
        size.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_case_insensitively() {
        assert_eq!("udbz".parse::<DmgFormat>().unwrap(), DmgFormat::Udbz);
        assert_eq!("ULFO".parse::<DmgFormat>().unwrap(), DmgFormat::Ulfo);
        assert!("ISO".parse::<DmgFormat>().is_err());
    }

    #[test]
    fn parses_sizes() {
        assert_eq!("100M".parse::<ImageSize>().unwrap().bytes(), 100 * 1024 * 1024);
        assert_eq!("512k".parse::<ImageSize>().unwrap().bytes(), 512 * 1024);
        assert_eq!("2gb".parse::<ImageSize>().unwrap().bytes(), 2 << 30);
        assert_eq!("1.5m".parse::<ImageSize>().unwrap().bytes(), 1536 * 1024);
        assert_eq!("4096".parse::<ImageSize>().unwrap().bytes(), 4096);
    }

    #[test]
    fn rejects_bad_sizes() {
        for bad in ["", "M", "0", "0M", "-1M", "tenM", "1x", "nan", "inf"] {
            assert!(bad.parse::<ImageSize>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn rejects_sizes_beyond_u64() {
        for huge in ["18446744073709551616", "16777216T", "1e30"] {
            assert!(huge.parse::<ImageSize>().is_err(), "{huge:?} should be rejected");
        }
        assert_eq!(
            "16777215T".parse::<ImageSize>().unwrap().bytes(),
            16_777_215u64 << 40
        );
    }

    #[test]
    fn hdiutil_arg_rounds_up_to_kilobytes() {
        assert_eq!(ImageSize::from_bytes(1).to_hdiutil_arg(), "1k");
        assert_eq!(ImageSize::from_bytes(2048).to_hdiutil_arg(), "2k");
        assert_eq!("100M".parse::<ImageSize>().unwrap().to_hdiutil_arg(), "102400k");
    }

    #[test]
    fn displays_in_largest_exact_unit() {
        assert_eq!("100M".parse::<ImageSize>().unwrap().to_string(), "100M");
        assert_eq!(ImageSize::from_bytes(1536).to_string(), "1536");
    }
}
