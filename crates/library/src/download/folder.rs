use crate::download::error::{ErrorKind, Result};
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::{Context, Layout};
use exn::ResultExt;
use specfetch_archive::{Archive, extract_in_place};
use specfetch_listing::last_segment;
use specfetch_release::{Release, resolve, resolve_release_folder};
use std::path::{Path, PathBuf};
use tracing::instrument;

const PDF_EXTENSION: &str = "pdf";

/// The outcome of (successfully) processing one specification folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing in the folder matches the release.
    Skipped { folder: String },
    /// Files were saved as downloaded.
    Downloaded { folder: String, files: Vec<PathBuf> },
    /// An archive was downloaded, unpacked and removed.
    Extracted {
        folder: String,
        archive: PathBuf,
        files: Vec<PathBuf>,
    },
}
impl Outcome {
    pub fn folder(&self) -> &str {
        match self {
            Self::Skipped { folder } | Self::Downloaded { folder, .. } | Self::Extracted { folder, .. } => folder,
        }
    }
}

/// Resolves, fetches and (optionally) extracts one specification folder into
/// `destination`.
///
/// Existing files with the same name are overwritten, so running twice over
/// the same destination simply repeats the work.
///
/// # Errors
/// Returns [`Exn<LibraryErrorKind::Download>`](LibraryErrorKind::Download)
/// raised from an inner [`Exn<ErrorKind>`](ErrorKind).
pub async fn download_folder(
    ctx: &Context,
    folder: &str,
    release: Release,
    destination: &Path,
) -> LibraryResult<Outcome> {
    download_folder_inner(ctx, folder, release, destination)
        .await
        .or_raise(|| LibraryErrorKind::Download(folder.to_string()))
}

#[instrument(skip(ctx, release, destination), fields(release = %release))]
pub(crate) async fn download_folder_inner(
    ctx: &Context,
    folder: &str,
    release: Release,
    destination: &Path,
) -> Result<Outcome> {
    match ctx.layout {
        Layout::Doc => download_archive(ctx, folder, release, destination).await,
        Layout::Pdf => download_release_pdfs(ctx, folder, release, destination).await,
    }
}

async fn download_archive(ctx: &Context, folder: &str, release: Release, destination: &Path) -> Result<Outcome> {
    let links = ctx.fetcher.links(folder).await.or_raise(|| ErrorKind::Fetch(folder.to_string()))?;
    let Some(artifact) = resolve(links.iter().filter(|link| link.is_file()), release.token()) else {
        tracing::debug!("No delivery for release");
        return Ok(Outcome::Skipped {
            folder: folder.to_string(),
        });
    };
    let saved = fetch_file(ctx, artifact.url(), destination).await?;
    if !ctx.extract || !Archive::from_path(&saved).is_archive() {
        return Ok(Outcome::Downloaded {
            folder: folder.to_string(),
            files: vec![saved],
        });
    }

    let (archive, into) = (saved.clone(), destination.to_path_buf());
    let extracted = tokio::task::spawn_blocking(move || extract_in_place(&archive, &into))
        .await
        .or_raise(|| ErrorKind::Task)?
        .or_raise(|| ErrorKind::Extract(saved.clone()))?;
    tracing::info!(archive = %extracted.archive.display(), files = extracted.files.len(), "Extracted");
    Ok(Outcome::Extracted {
        folder: folder.to_string(),
        archive: extracted.archive,
        files: extracted.files,
    })
}

async fn download_release_pdfs(ctx: &Context, folder: &str, release: Release, destination: &Path) -> Result<Outcome> {
    let versions = ctx.fetcher.links(folder).await.or_raise(|| ErrorKind::Fetch(folder.to_string()))?;
    let Some(release_folder) = resolve_release_folder(versions.iter().filter(|link| link.is_folder()), release) else {
        tracing::debug!("No release folder");
        return Ok(Outcome::Skipped {
            folder: folder.to_string(),
        });
    };
    let files = ctx.fetcher.links(&release_folder).await.or_raise(|| ErrorKind::Fetch(release_folder.clone()))?;
    let mut saved = Vec::new();
    for file in files.iter().filter(|link| link.is_file() && has_extension(link.name(), PDF_EXTENSION)) {
        saved.push(fetch_file(ctx, &file.url, destination).await?);
    }
    if saved.is_empty() {
        tracing::debug!(release_folder = %release_folder, "Release folder holds no PDF");
        return Ok(Outcome::Skipped {
            folder: folder.to_string(),
        });
    }
    Ok(Outcome::Downloaded {
        folder: folder.to_string(),
        files: saved,
    })
}

/// Fetch `url` into `destination/<final URL segment>`.
async fn fetch_file(ctx: &Context, url: &str, destination: &Path) -> Result<PathBuf> {
    let target = destination.join(last_segment(url));
    if tokio::fs::try_exists(&target).await.unwrap_or(false) {
        tracing::info!(path = %target.display(), "Overwriting existing file");
    }
    let bytes = ctx.fetcher.download(url, &target).await.or_raise(|| ErrorKind::Fetch(url.to_string()))?;
    tracing::info!(url, path = %target.display(), bytes, "Downloaded");
    Ok(target)
}

fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name).extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ARCHIVE, ETSI, context, zip_bytes};
    use specfetch_fetch::backend::MockFetcher;
    use std::sync::Arc;

    const FOLDER: &str = "https://archive.test/Specs/archive/38_series/38.331";

    fn release(number: i64) -> Release {
        Release::try_from(number).unwrap()
    }

    fn archive_folder(extra: &[(&str, Vec<u8>)]) -> Arc<MockFetcher> {
        let listing = MockFetcher::listing_html(["38331-e30.zip", "38331-f00.zip", "38331-f10.zip", "38331-g00.zip"]);
        let mut resources = vec![(FOLDER.to_string(), listing.into_bytes())];
        resources.extend(extra.iter().map(|(name, data)| (format!("{FOLDER}/{name}"), data.clone())));
        Arc::new(MockFetcher::with_resources(resources))
    }

    #[tokio::test]
    async fn extracts_newest_archive_for_release() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = archive_folder(&[("38331-f10.zip", zip_bytes(&[("38331-f10.docx", b"rrc")]))]);
        let ctx = context(fetcher, Layout::Doc);

        let outcome = download_folder(&ctx, FOLDER, release(15), dir.path()).await.unwrap();
        let Outcome::Extracted { archive, files, .. } = outcome else {
            panic!("expected extraction, got {outcome:?}");
        };
        assert_eq!(archive, dir.path().join("38331-f10.zip"));
        assert!(!archive.exists());
        assert_eq!(files, vec![dir.path().join("38331-f10.docx")]);
        assert_eq!(std::fs::read(dir.path().join("38331-f10.docx")).unwrap(), b"rrc");
    }

    #[tokio::test]
    async fn keeps_archive_without_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = archive_folder(&[("38331-g00.zip", zip_bytes(&[("38331-g00.docx", b"rrc")]))]);
        let mut ctx = context(fetcher, Layout::Doc);
        ctx.extract = false;

        let outcome = download_folder(&ctx, FOLDER, release(16), dir.path()).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Downloaded {
                folder: FOLDER.to_string(),
                files: vec![dir.path().join("38331-g00.zip")],
            }
        );
        assert!(dir.path().join("38331-g00.zip").exists());
    }

    #[tokio::test]
    async fn skips_release_without_match() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = archive_folder(&[]);
        let ctx = context(fetcher.clone(), Layout::Doc);

        let outcome = download_folder(&ctx, FOLDER, release(12), dir.path()).await.unwrap();
        assert_eq!(outcome, Outcome::Skipped { folder: FOLDER.to_string() });
        // Only the folder listing was requested.
        assert_eq!(fetcher.requests(), 1);
    }

    #[tokio::test]
    async fn overwrites_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("38331-f10.zip"), b"stale bytes from an earlier run").unwrap();
        let fetcher = archive_folder(&[("38331-f10.zip", b"fresh".to_vec())]);
        let mut ctx = context(fetcher, Layout::Doc);
        ctx.extract = false;

        download_folder(&ctx, FOLDER, release(15), dir.path()).await.unwrap();
        assert_eq!(std::fs::read(dir.path().join("38331-f10.zip")).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn corrupt_archive_is_retained() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = archive_folder(&[("38331-f10.zip", b"PK\x03\x04 but not really".to_vec())]);
        let ctx = context(fetcher, Layout::Doc);

        let err = download_folder(&ctx, FOLDER, release(15), dir.path()).await.unwrap_err();
        assert_eq!(*err, LibraryErrorKind::Download(FOLDER.to_string()));
        let inner = download_folder_inner(&ctx, FOLDER, release(15), dir.path()).await.unwrap_err();
        assert_eq!(*inner, ErrorKind::Extract(dir.path().join("38331-f10.zip")));
        assert!(dir.path().join("38331-f10.zip").exists());
    }

    #[tokio::test]
    async fn missing_artifact_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(archive_folder(&[]), Layout::Doc);

        let err = download_folder_inner(&ctx, FOLDER, release(15), dir.path()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Fetch(format!("{FOLDER}/38331-f10.zip")));
    }

    #[tokio::test]
    async fn pdf_layout_downloads_every_pdf_of_release_folder() {
        let dir = tempfile::tempdir().unwrap();
        let spec = format!("{ETSI}/138300_138399/138331");
        let chosen = format!("{spec}/15.06.00_60");
        let fetcher = Arc::new(MockFetcher::with_resources([
            (spec.clone(), MockFetcher::listing_html(["15.03.00_60/", "15.06.00_60/", "16.01.00_60/"]).into_bytes()),
            (chosen.clone(), MockFetcher::listing_html(["ts_138331v150600p.pdf", "ts_138331v150600p0.zip"]).into_bytes()),
            (format!("{chosen}/ts_138331v150600p.pdf"), b"%PDF".to_vec()),
        ]));
        let ctx = context(fetcher, Layout::Pdf);

        let outcome = download_folder(&ctx, &spec, release(15), dir.path()).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Downloaded {
                folder: spec,
                files: vec![dir.path().join("ts_138331v150600p.pdf")],
            }
        );
    }

    #[tokio::test]
    async fn pdf_layout_skips_missing_release() {
        let dir = tempfile::tempdir().unwrap();
        let spec = format!("{ARCHIVE}/138331");
        let fetcher = Arc::new(MockFetcher::with_resources([(spec.clone(), MockFetcher::listing_html(["16.01.00_60/"]))]));
        let ctx = context(fetcher, Layout::Pdf);

        let outcome = download_folder(&ctx, &spec, release(15), dir.path()).await.unwrap();
        assert_eq!(outcome, Outcome::Skipped { folder: spec });
    }
}
