//! The closed set of target font container formats.

use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;

/// Output container format selected for a batch.
///
/// The set is fixed by the conversion endpoint's contract; which input
/// formats a given converter can actually read from is the converter's
/// business, not ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    Woff2,
    Woff,
    Ttf,
    Otf,
}

impl TargetFormat {
    /// All supported target formats, in the order shown to users.
    pub const ALL: [TargetFormat; 4] = [
        TargetFormat::Woff2,
        TargetFormat::Woff,
        TargetFormat::Ttf,
        TargetFormat::Otf,
    ];

    /// File extension for this format, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Woff2 => "woff2",
            TargetFormat::Woff => "woff",
            TargetFormat::Ttf => "ttf",
            TargetFormat::Otf => "otf",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = ConvertError;

    /// Parse a user-supplied format label. Case-insensitive; a leading dot
    /// is tolerated so `.woff2` and `woff2` both work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match label.as_str() {
            "woff2" => Ok(TargetFormat::Woff2),
            "woff" => Ok(TargetFormat::Woff),
            "ttf" => Ok(TargetFormat::Ttf),
            "otf" => Ok(TargetFormat::Otf),
            _ => Err(ConvertError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("woff2".parse::<TargetFormat>().unwrap(), TargetFormat::Woff2);
        assert_eq!("WOFF".parse::<TargetFormat>().unwrap(), TargetFormat::Woff);
        assert_eq!(" ttf ".parse::<TargetFormat>().unwrap(), TargetFormat::Ttf);
        assert_eq!(".otf".parse::<TargetFormat>().unwrap(), TargetFormat::Otf);

        assert!(matches!(
            "eot".parse::<TargetFormat>(),
            Err(ConvertError::UnsupportedFormat(_))
        ));
        assert!("".parse::<TargetFormat>().is_err());
    }

    #[test]
    fn test_format_extension_round_trip() {
        for format in TargetFormat::ALL {
            assert_eq!(format.extension().parse::<TargetFormat>().unwrap(), format);
            assert_eq!(format.to_string(), format.extension());
        }
    }
}
