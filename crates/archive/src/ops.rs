//! Archive Operations

use crate::Archive;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::instrument;
use zip::ZipArchive;

/// The result of a successful [`extract_in_place`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Path of the (now deleted) archive.
    pub archive: PathBuf,
    /// Every file written, in archive order.
    pub files: Vec<PathBuf>,
}

impl Archive {
    /// Extract every entry of `archive` into the `into` directory.
    ///
    /// Existing files are overwritten. Entries whose names would escape
    /// `into` (absolute paths, `..` components) are skipped.
    #[instrument(skip_all, fields(format = %self, archive = %archive.display(), files))]
    pub fn extract(&self, archive: &Path, into: &Path) -> Result<Vec<PathBuf>> {
        let files = match self {
            Archive::None => exn::bail!(ErrorKind::UnsupportedFormat(archive.display().to_string())),
            Archive::Zip => extract_zip(archive, into)?,
        };
        tracing::Span::current().record("files", files.len());
        Ok(files)
    }
}

fn extract_zip(archive: &Path, into: &Path) -> Result<Vec<PathBuf>> {
    let reader = BufReader::new(File::open(archive).or_raise(|| ErrorKind::Io)?);
    let mut zip = ZipArchive::new(reader).or_raise(|| ErrorKind::InvalidData)?;
    let mut files = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).or_raise(|| ErrorKind::InvalidData)?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(entry = entry.name(), "Skipping archive entry with unsafe path");
            continue;
        };
        let target = into.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&target).or_raise(|| ErrorKind::Io)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
        }
        let mut output = File::create(&target).or_raise(|| ErrorKind::Io)?;
        // Decompression and checksum failures surface as read errors here.
        io::copy(&mut entry, &mut output).or_raise(|| ErrorKind::InvalidData)?;
        tracing::trace!(path = %target.display(), "Archive entry extracted");
        files.push(target);
    }
    Ok(files)
}

/// Extract an archive into `into`, then delete the archive.
///
/// All or nothing: the archive is only removed once every entry has been
/// written. On failure it stays on disk so it can be inspected or retried.
///
/// # Errors
///
/// Returns [`UnsupportedFormat`](ErrorKind::UnsupportedFormat) if the path is
/// not a recognised archive, [`InvalidData`](ErrorKind::InvalidData) for
/// corrupt archives and [`Io`](ErrorKind::Io) for filesystem failures.
#[instrument(skip_all, fields(archive = %archive.as_ref().display()))]
pub fn extract_in_place(archive: impl AsRef<Path>, into: impl AsRef<Path>) -> Result<Extracted> {
    let archive = archive.as_ref();
    let format = Archive::from_path(archive);
    let files = format.extract(archive, into.as_ref())?;
    fs::remove_file(archive).or_raise(|| ErrorKind::Io)?;
    tracing::debug!(files = files.len(), "Archive extracted and removed");
    Ok(Extracted {
        archive: archive.to_path_buf(),
        files,
    })
}
