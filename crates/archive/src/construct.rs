use crate::Archive;
use crate::error::{Error, ErrorKind};
use std::{path::Path, str::FromStr};

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

impl FromStr for Archive {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Archive::None),
            "zip" => Ok(Archive::Zip),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(s.to_string())),
        }
    }
}
impl From<&[u8]> for Archive {
    fn from(value: &[u8]) -> Self {
        Archive::from_magic_bytes(value)
    }
}
impl Archive {
    /// Detect the archive format from a file extension.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext.to_lowercase().as_str() {
                "zip" => Archive::Zip,
                _ => Archive::None,
            })
            .unwrap_or(Archive::None)
    }

    /// Detect the archive format from magic bytes.
    ///
    /// Returns `None` variant if no magic bytes match or if the input
    /// is too short to detect any format.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&ZIP_MAGIC) || bytes.starts_with(&ZIP_EMPTY_MAGIC) {
            return Archive::Zip;
        }
        Archive::None
    }

    /// File extension for the format, without the leading dot.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Archive::None => None,
            Archive::Zip => Some("zip"),
        }
    }
}
impl std::fmt::Display for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().unwrap_or("none"))
    }
}
