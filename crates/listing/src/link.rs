use crate::{consts, last_segment};
use tracing::instrument;

/// Whether a listing anchor pointed at a nested folder or at a leaf file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Anchor target ended with a `/`.
    Folder,
    /// Anchor target was a file (`38331-e30.zip`).
    File,
}

/// A single child of a directory listing, resolved against the listing URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkEntry {
    pub url: String,
    pub kind: LinkKind,
}
impl LinkEntry {
    /// Final path segment of the entry (the folder or file name).
    pub fn name(&self) -> &str {
        last_segment(&self.url)
    }

    pub fn is_folder(&self) -> bool {
        self.kind == LinkKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind == LinkKind::File
    }
}
impl AsRef<str> for LinkEntry {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

/// Lazily extracts the child links of one directory listing.
///
/// Every anchor target is reduced to its last path segment and appended to
/// `base`, so absolute (`/ftp/Specs/archive/38_series/38.331/`) and relative
/// (`38.331/`) targets resolve identically. Navigational anchors whose text
/// starts with `[` are never yielded.
///
/// # Examples
///
/// ```rust
/// use specfetch_listing::{LinkKind, links};
/// let html = r#"
///     <A HREF="/ftp/Specs/archive/">[To Parent Directory]</A><br>
///     <A HREF="/ftp/Specs/archive/38_series/38.331/">38.331</A><br>
///     <a href="/ftp/Specs/archive/38_series/38.331/38331-f00.zip">38331-f00.zip</a>
/// "#;
/// let found: Vec<_> = links("https://www.3gpp.org/ftp/Specs/archive/38_series", html).collect();
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].url, "https://www.3gpp.org/ftp/Specs/archive/38_series/38.331");
/// assert_eq!(found[0].kind, LinkKind::Folder);
/// assert_eq!(found[1].name(), "38331-f00.zip");
/// ```
#[instrument(level = "trace", skip(body), fields(body_size = body.len()))]
pub fn links<'a>(base: &'a str, body: &'a str) -> impl Iterator<Item = LinkEntry> + 'a {
    let base = base.strip_suffix('/').unwrap_or(base);
    consts::ANCHOR_REGEX.captures_iter(body).filter_map(move |captures| {
        let target = captures.get(1)?.as_str();
        let kind = if target.ends_with('/') { LinkKind::Folder } else { LinkKind::File };
        let name = last_segment(target);
        if name.is_empty() {
            return None;
        }
        Some(LinkEntry {
            url: format!("{base}/{name}"),
            kind,
        })
    })
}
