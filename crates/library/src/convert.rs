//! Word-to-PDF conversion of downloaded specifications.

use crate::error::{ErrorKind, Result};
use crate::merge::stream::list_files;
use crate::report::Event;
use crate::series_code;
use async_stream::stream;
use exn::ResultExt;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use specfetch_pdf::{Conversion, DocumentConverter, is_convertible};
use std::path::{Path, PathBuf};

/// Progress events emitted by [`convert`], in the same order as the other
/// pipeline streams.
#[derive(Debug)]
pub enum ConvertEvent {
    Started,
    DiscoveryComplete(u64),
    Converted(Conversion),
    Complete,
}
impl Event for ConvertEvent {
    type Item = Conversion;
    fn finished(self) -> Option<Conversion> {
        match self {
            Self::Converted(conversion) => Some(conversion),
            _ => None,
        }
    }
}

/// Word documents of `series` in `directory` without a PDF next to them.
pub async fn pending_documents(directory: &Path, series: u8) -> Result<Vec<PathBuf>> {
    let code = series_code(series);
    let mut documents: Vec<_> = list_files(directory)
        .await?
        .into_iter()
        .filter(|path| {
            path.file_name().and_then(|name| name.to_str()).is_some_and(|name| name.starts_with(&code))
                && is_convertible(path)
                && !path.with_extension("pdf").exists()
        })
        .collect();
    documents.sort();
    Ok(documents)
}

/// Converts every [pending document](pending_documents), up to `workers` at a
/// time. Each conversion is bounded by the converter's own timeout.
///
/// With an [unavailable](DocumentConverter::Unavailable) converter nothing is
/// converted: a warning is logged and the stream completes immediately.
pub fn convert<'a>(
    converter: &'a DocumentConverter,
    directory: &'a Path,
    series: u8,
    workers: usize,
) -> impl Stream<Item = Result<ConvertEvent>> + 'a {
    stream!({
        yield Ok(ConvertEvent::Started);
        if !converter.is_available() {
            tracing::warn!(directory = %directory.display(), "No document converter available; skipping conversion");
            yield Ok(ConvertEvent::DiscoveryComplete(0));
            yield Ok(ConvertEvent::Complete);
            return;
        }

        let documents = match pending_documents(directory, series).await {
            Ok(documents) => documents,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
        yield Ok(ConvertEvent::DiscoveryComplete(u64::try_from(documents.len()).unwrap_or(0)));

        let mut futures: Vec<_> = documents
            .into_iter()
            .map(|document| async move {
                converter.convert(&document).await.or_raise(|| ErrorKind::Convert(document.clone()))
            })
            .collect();
        let mut processing = FuturesUnordered::new();
        processing.extend(futures.drain(..workers.max(1).min(futures.len())));
        while let Some(result) = processing.next().await {
            yield result.map(ConvertEvent::Converted);
            if !futures.is_empty() {
                processing.push(futures.remove(0));
            }
        }

        yield Ok(ConvertEvent::Complete);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Report;
    use std::fs;
    use std::time::Duration;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), name).unwrap();
        }
    }

    #[tokio::test]
    async fn pending_documents_of_series() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &["38331-f10.docx", "38300-f10.doc", "38300-f10.pdf", "36331-f10.docx", "38331-f10.zip", "38401-f00.docx"],
        );
        let documents = pending_documents(dir.path(), 38).await.unwrap();
        assert_eq!(documents, vec![dir.path().join("38331-f10.docx"), dir.path().join("38401-f00.docx")]);
    }

    #[tokio::test]
    async fn unavailable_converter_skips() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["38331-f10.docx"]);
        let report = Report::collect(convert(&DocumentConverter::Unavailable, dir.path(), 38, 2)).await;
        assert!(report.completed.is_empty());
        assert!(report.is_success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn converts_with_office_tool() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let tool = bin.path().join("soffice");
        fs::write(
            &tool,
            "#!/bin/sh\nfor input; do :; done\ncase \"$input\" in *broken*) exit 3;; esac\necho pdf > \"${input%.*}.pdf\"\n",
        )
        .unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        touch(dir.path(), &["38331-f10.docx", "38300-f10.doc", "38401-broken.doc"]);

        let converter = DocumentConverter::Office {
            path: tool,
            timeout: Duration::from_secs(10),
        };
        let report = Report::collect(convert(&converter, dir.path(), 38, 2)).await;

        assert_eq!(report.completed.len(), 2);
        assert!(dir.path().join("38331-f10.pdf").exists());
        assert!(dir.path().join("38300-f10.pdf").exists());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(*report.failures[0], ErrorKind::Convert(dir.path().join("38401-broken.doc")));
    }
}
