//! Walks an archive from a series down to its specification folders.

use crate::error::{ErrorKind, Result};
use crate::{Context, Layout, series_code};
use exn::ResultExt;
use tracing::instrument;

/// Lists the specification folders of a series.
///
/// - [`Layout::Doc`]: children of `{archive_url}/{series}_series` whose name
///   starts with the series code (`38.331`).
/// - [`Layout::Pdf`]: the deliverables root is split into number ranges
///   (`138300_138399`); every range whose name carries the series code at
///   characters 1..3 is listed in turn and all its children are collected.
///
/// # Errors
///
/// Returns [`Crawl`](ErrorKind::Crawl) naming the listing that could not be
/// read. A failing range listing fails the whole crawl.
#[instrument(skip(ctx), fields(layout = %ctx.layout))]
pub async fn spec_folders(ctx: &Context, series: u8) -> Result<Vec<String>> {
    let code = series_code(series);
    let folders = match ctx.layout {
        Layout::Doc => {
            let base = format!("{}/{code}_series", ctx.archive_url);
            ctx.fetcher
                .links(&base)
                .await
                .or_raise(|| ErrorKind::Crawl(base.clone()))?
                .into_iter()
                .filter(|link| link.name().starts_with(&code))
                .map(|link| link.url)
                .collect()
        },
        Layout::Pdf => {
            let ranges = ctx.fetcher.links(&ctx.etsi_url).await.or_raise(|| ErrorKind::Crawl(ctx.etsi_url.clone()))?;
            let mut folders = Vec::new();
            for range in ranges.iter().filter(|link| link.is_folder() && link.name().get(1..3) == Some(code.as_str())) {
                tracing::debug!(range = range.name(), "Listing range");
                let specs = ctx.fetcher.links(&range.url).await.or_raise(|| ErrorKind::Crawl(range.url.clone()))?;
                folders.extend(specs.into_iter().filter(|link| link.is_folder()).map(|link| link.url));
            }
            folders
        },
    };
    tracing::info!(folders = folders.len(), "Specification folders discovered");
    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ARCHIVE, ETSI, context};
    use specfetch_fetch::backend::MockFetcher;
    use std::sync::Arc;

    #[tokio::test]
    async fn doc_layout_keeps_series_folders() {
        let fetcher = Arc::new(MockFetcher::with_resources([(
            format!("{ARCHIVE}/38_series"),
            MockFetcher::listing_html(["38.101-1/", "38.331/", "README.txt", "36.331/"]),
        )]));
        let ctx = context(fetcher, Layout::Doc);
        let folders = spec_folders(&ctx, 38).await.unwrap();
        assert_eq!(folders, vec![format!("{ARCHIVE}/38_series/38.101-1"), format!("{ARCHIVE}/38_series/38.331")]);
    }

    #[tokio::test]
    async fn doc_layout_pads_series() {
        let fetcher = Arc::new(MockFetcher::with_resources([(
            format!("{ARCHIVE}/01_series"),
            MockFetcher::listing_html(["01.01/", "01.02/"]),
        )]));
        let ctx = context(fetcher, Layout::Doc);
        assert_eq!(spec_folders(&ctx, 1).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn pdf_layout_walks_matching_ranges() {
        let fetcher = Arc::new(MockFetcher::with_resources([
            (ETSI.to_string(), MockFetcher::listing_html(["136300_136399/", "138300_138399/", "138400_138499/"])),
            (format!("{ETSI}/138300_138399"), MockFetcher::listing_html(["138300/", "138331/"])),
            (format!("{ETSI}/138400_138499"), MockFetcher::listing_html(["138401/"])),
        ]));
        let ctx = context(fetcher.clone(), Layout::Pdf);
        let folders = spec_folders(&ctx, 38).await.unwrap();
        assert_eq!(
            folders,
            vec![
                format!("{ETSI}/138300_138399/138300"),
                format!("{ETSI}/138300_138399/138331"),
                format!("{ETSI}/138400_138499/138401"),
            ]
        );
        // The 36 range is never listed.
        assert_eq!(fetcher.requests(), 3);
    }

    #[tokio::test]
    async fn missing_series_is_a_crawl_error() {
        let ctx = context(Arc::new(MockFetcher::default()), Layout::Doc);
        let err = spec_folders(&ctx, 38).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Crawl(format!("{ARCHIVE}/38_series")));
    }
}
