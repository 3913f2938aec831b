use crate::{Release, ReleaseToken};
use specfetch_listing::last_segment;
use tracing::instrument;

/// Only archive-bundled specification deliveries are downloaded.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// The artifact chosen for one specification folder.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Artifact {
    url: String,
}
impl Artifact {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Name the artifact is saved under (the final URL segment).
    pub fn file_name(&self) -> &str {
        last_segment(&self.url)
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

/// Returns `true` if the version suffix of the URL's filename starts with the
/// release token.
///
/// The suffix is whatever follows the last `-` of the filename, so
/// `38101-1-f30.zip` carries suffix `f30.zip`. Filenames without any `-` carry
/// no version and never match.
///
/// ```rust
/// use specfetch_release::{Release, matches_token};
/// let rel15 = Release::try_from(15).unwrap().token();
/// assert!(matches_token("https://example.org/38.331/38331-f00.zip", rel15));
/// assert!(!matches_token("https://example.org/38.331/38331-e30.zip", rel15));
/// assert!(!matches_token("https://example.org/38.331/fixtures.zip", rel15));
/// ```
pub fn matches_token(url: &str, token: ReleaseToken) -> bool {
    last_segment(url)
        .rsplit_once('-')
        .is_some_and(|(_, version)| version.starts_with(token.as_char()))
}

fn has_extension(url: &str, extension: &str) -> bool {
    last_segment(url).rsplit_once('.').is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(extension))
}

/// Picks the newest artifact for a release among the files of one
/// specification folder.
///
/// Candidates matching the token are compared as plain strings and the
/// greatest one wins. This only equals "newest version" because the archive
/// encodes versions with fixed-width alphabet digits (`e30` < `e40` <
/// `ea0`); it is not a semantic version comparison.
///
/// The winner is discarded when it is not an archive: a folder whose newest
/// delivery for the release is, say, a bare `.doc` yields nothing. An empty
/// set of matches also yields nothing; neither case is an error.
#[instrument(level = "debug", skip(candidates), fields(token = %token))]
pub fn resolve<I, S>(candidates: I, token: ReleaseToken) -> Option<Artifact>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let latest = candidates
        .into_iter()
        .filter(|candidate| matches_token(candidate.as_ref(), token))
        .max_by(|a, b| a.as_ref().cmp(b.as_ref()))?;
    let latest = latest.as_ref();
    if !has_extension(latest, ARCHIVE_EXTENSION) {
        tracing::debug!(url = latest, "Latest candidate is not an archive; skipping");
        return None;
    }
    Some(Artifact { url: latest.to_string() })
}

/// Picks the newest release folder (`15.02.00_60`) for a release among the
/// version folders of a deliverables tree.
///
/// Folder names are compared on their major component only, so release 1
/// does not pick up release 15 folders.
///
/// ```rust
/// use specfetch_release::{Release, resolve_release_folder};
/// let folders = [
///     "https://example.org/138101/15.00.00_60",
///     "https://example.org/138101/15.02.00_60",
///     "https://example.org/138101/16.01.00_60",
/// ];
/// let release = Release::try_from(15).unwrap();
/// assert_eq!(resolve_release_folder(folders, release).as_deref(), Some(folders[1]));
/// ```
#[instrument(level = "debug", skip(candidates), fields(release = %release))]
pub fn resolve_release_folder<I, S>(candidates: I, release: Release) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .filter(|candidate| {
            last_segment(candidate.as_ref())
                .split('.')
                .next()
                .and_then(|major| major.parse::<u8>().ok())
                .is_some_and(|major| major == release.number())
        })
        .max_by(|a, b| a.as_ref().cmp(b.as_ref()))
        .map(|latest| latest.as_ref().to_string())
}
