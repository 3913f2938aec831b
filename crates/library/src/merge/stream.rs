use crate::error::{ErrorKind, Result};
use crate::merge::group::{SpecificationGroup, group_files};
use crate::report::Event;
use async_stream::stream;
use exn::ResultExt;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use specfetch_pdf::Merge;
use std::path::{Path, PathBuf};
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Extension of the parts and of the merged output.
    pub extension: String,
    /// Remove the parts once their merge succeeded.
    pub delete_originals: bool,
    /// Maximum number of merges in flight.
    pub workers: usize,
}
impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            extension: "pdf".to_string(),
            delete_originals: false,
            workers: 8,
        }
    }
}

/// A successfully merged specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub identifier: String,
    pub output: PathBuf,
    pub sources: Vec<PathBuf>,
    /// Whether the sources were deleted.
    pub deleted: bool,
}

/// Progress events emitted by [`merge`].
///
/// [`Started`](Self::Started), then [`DiscoveryComplete`](Self::DiscoveryComplete)
/// with the number of groups, one [`Merged`](Self::Merged) (or error) per
/// group and finally [`Complete`](Self::Complete). Failing to read the
/// directory ends the stream early.
#[derive(Debug)]
pub enum MergeEvent {
    Started,
    DiscoveryComplete(u64),
    Merged(Merged),
    Complete,
}
impl Event for MergeEvent {
    type Item = Merged;
    fn finished(self) -> Option<Merged> {
        match self {
            Self::Merged(merged) => Some(merged),
            _ => None,
        }
    }
}

/// Merges every [group](group_files) of parts found in `directory`.
///
/// Groups are merged concurrently, up to `options.workers` at a time, in no
/// particular order. A failing group is yielded as an error naming its
/// identifier; its parts are left untouched and no output is created.
pub fn merge<'a>(
    merger: &'a dyn Merge,
    directory: &'a Path,
    options: &'a MergeOptions,
) -> impl Stream<Item = Result<MergeEvent>> + 'a {
    stream!({
        yield Ok(MergeEvent::Started);

        let files = match list_files(directory).await {
            Ok(files) => files,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        let groups = group_files(files, &options.extension);
        // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
        yield Ok(MergeEvent::DiscoveryComplete(u64::try_from(groups.len()).unwrap_or(0)));

        let mut futures: Vec<_> = groups.into_iter().map(|group| merge_group(merger, group, options)).collect();
        let mut processing = FuturesUnordered::new();
        processing.extend(futures.drain(..options.workers.max(1).min(futures.len())));
        while let Some(result) = processing.next().await {
            yield result.map(MergeEvent::Merged);
            // Pop-n-push, but FIFO instead of LIFO.
            if !futures.is_empty() {
                processing.push(futures.remove(0));
            }
        }

        yield Ok(MergeEvent::Complete);
    })
}

/// Merges one group into its output, then deletes the sources if asked to.
///
/// # Errors
/// Returns [`Merge`](ErrorKind::Merge) naming the identifier when the merge
/// tool fails or a source cannot be deleted afterwards.
#[instrument(skip_all, fields(identifier = %group.identifier, files = group.files.len()))]
pub async fn merge_group(merger: &dyn Merge, group: SpecificationGroup, options: &MergeOptions) -> Result<Merged> {
    let SpecificationGroup {
        identifier,
        files,
        output,
    } = group;
    tracing::info!(output = %output.display(), "Merging specification");
    merger.merge(&files, &output).await.or_raise(|| ErrorKind::Merge(identifier.clone()))?;
    if options.delete_originals {
        for file in &files {
            tokio::fs::remove_file(file).await.or_raise(|| ErrorKind::Merge(identifier.clone()))?;
        }
        tracing::debug!("Sources deleted");
    }
    Ok(Merged {
        identifier,
        output,
        sources: files,
        deleted: options.delete_originals,
    })
}

/// Regular files of `directory`, skipping hidden ones such as staging files
/// left behind by an interrupted merge.
pub(crate) async fn list_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = || ErrorKind::ReadDir(directory.to_path_buf());
    let mut entries = tokio::fs::read_dir(directory).await.or_raise(read_dir)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.or_raise(read_dir)? {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type().await.or_raise(read_dir)?.is_file() {
            files.push(entry.path());
        }
    }
    Ok(files)
}
