//! Release handling for the specification archive.
//!
//! Archive filenames carry a version suffix whose first character encodes the
//! release generation (`38331-f00.zip` is release 15, version `f.0.0`). This
//! crate validates release numbers, derives their [`ReleaseToken`] and picks
//! the newest artifact for a release out of a folder's candidates.

pub mod error;
mod resolve;

use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use std::fmt;
use std::str::FromStr;

pub use crate::resolve::{Artifact, ARCHIVE_EXTENSION, matches_token, resolve, resolve_release_folder};

/// Ordered alphabet mapping a release number to its token character.
pub const ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// The single-character code for a release generation, as used in the
/// version suffix of archive filenames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReleaseToken(char);
impl ReleaseToken {
    pub fn as_char(&self) -> char {
        self.0
    }
}
impl fmt::Display for ReleaseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated release number.
///
/// Construction fails for any number that cannot index [`ALPHABET`], so a
/// `Release` always has a token. Validation happens before anything touches
/// the network.
///
/// ```rust
/// use specfetch_release::Release;
/// let release: Release = "15".parse().unwrap();
/// assert_eq!(release.number(), 15);
/// assert_eq!(release.token().to_string(), "f");
/// assert!("36".parse::<Release>().is_err());
/// assert!("-1".parse::<Release>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Release {
    number: u8,
    token: ReleaseToken,
}
impl Release {
    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn token(&self) -> ReleaseToken {
        self.token
    }

    /// Highest release number with a token.
    pub const MAX: usize = ALPHABET.len() - 1;
}
impl TryFrom<i64> for Release {
    type Error = Error;
    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        let out_of_range = || ErrorKind::OutOfRange { value, max: Release::MAX };
        let index = usize::try_from(value).or_raise(out_of_range)?;
        let Some(token) = ALPHABET.chars().nth(index) else {
            exn::bail!(out_of_range());
        };
        Ok(Self {
            number: u8::try_from(index).or_raise(out_of_range)?,
            token: ReleaseToken(token),
        })
    }
}
impl FromStr for Release {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().parse::<i64>().or_raise(|| ErrorKind::InvalidNumber(s.to_string()))?;
        Self::try_from(value)
    }
}
impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}
