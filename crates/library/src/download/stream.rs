use crate::Context;
use crate::crawl::spec_folders;
use crate::download::error::ErrorKind;
use crate::download::folder::{Outcome, download_folder_inner};
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::report::Event;
use async_stream::stream;
use exn::ResultExt;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use specfetch_release::Release;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Progress events emitted by [`download`] and [`dispatch`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started) — exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete) — exactly once, with the
///    number of specification folders.
/// 3. [`Finished`](Self::Finished) — zero or more times, one per folder, in
///    completion order.
/// 4. [`Complete`](Self::Complete) — exactly once.
///
/// A failed crawl ends the stream after its error, without
/// [`Complete`](Self::Complete).
#[derive(Debug)]
pub enum DownloadEvent {
    Started,
    DiscoveryComplete(u64),
    Finished(Outcome),
    Complete,
}
impl Event for DownloadEvent {
    type Item = Outcome;
    fn finished(self) -> Option<Outcome> {
        match self {
            Self::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Crawls the folders of `series` then [dispatches](dispatch) them.
pub fn download<'a>(
    ctx: &'a Context,
    series: u8,
    release: Release,
    destination: &'a Path,
) -> impl Stream<Item = LibraryResult<DownloadEvent>> + 'a {
    stream!({
        yield Ok(DownloadEvent::Started);
        let folders = match spec_folders(ctx, series).await {
            Ok(folders) => folders,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        for await event in dispatch_inner(ctx, folders, release, destination) {
            yield event;
        }
    })
}

/// Streams one [`DownloadEvent::Finished`] per folder (or an error naming
/// it).
///
/// Each folder runs as its own spawned task, so folders are processed in
/// parallel on the runtime's worker threads, at most `ctx.workers` at a time.
/// The next folder is started as soon as one finishes. A folder exceeding
/// `ctx.task_timeout` is abandoned and reported as failed.
pub fn dispatch<'a>(
    ctx: &'a Context,
    folders: Vec<String>,
    release: Release,
    destination: &'a Path,
) -> impl Stream<Item = LibraryResult<DownloadEvent>> + 'a {
    stream!({
        yield Ok(DownloadEvent::Started);
        for await event in dispatch_inner(ctx, folders, release, destination) {
            yield event;
        }
    })
}

fn dispatch_inner<'a>(
    ctx: &'a Context,
    folders: Vec<String>,
    release: Release,
    destination: &'a Path,
) -> impl Stream<Item = LibraryResult<DownloadEvent>> + 'a {
    stream!({
        // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
        yield Ok(DownloadEvent::DiscoveryComplete(u64::try_from(folders.len()).unwrap_or(0)));

        let mut pending: VecDeque<String> = folders.into();
        let mut processing = FuturesUnordered::new();
        while processing.len() < ctx.workers {
            let Some(folder) = pending.pop_front() else { break };
            processing.push(spawn_folder(ctx.clone(), folder, release, destination.to_path_buf()));
        }
        while let Some(result) = processing.next().await {
            yield result.map(DownloadEvent::Finished);
            // Pop-n-push, FIFO.
            if let Some(folder) = pending.pop_front() {
                processing.push(spawn_folder(ctx.clone(), folder, release, destination.to_path_buf()));
            }
        }

        yield Ok(DownloadEvent::Complete);
    })
}

/// Spawns the work for one folder, returning a future for its result.
fn spawn_folder(
    ctx: Context,
    folder: String,
    release: Release,
    destination: PathBuf,
) -> impl Future<Output = LibraryResult<Outcome>> {
    let name = folder.clone();
    let handle = tokio::spawn(async move {
        let timeout = ctx.task_timeout;
        match tokio::time::timeout(timeout, download_folder_inner(&ctx, &folder, release, &destination)).await {
            Ok(result) => result,
            Err(elapsed) => Err(elapsed).or_raise(|| ErrorKind::Timeout(timeout)),
        }
    });
    async move {
        handle
            .await
            .or_raise(|| ErrorKind::Task)
            .and_then(|result| result)
            .or_raise(|| LibraryErrorKind::Download(name))
    }
}
