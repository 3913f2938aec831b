//! Link extraction for archive directory listings.
//!
//! The archive publishes plain server-generated directory listings: one
//! `<A HREF="...">name</A>` anchor per child, plus a `[To Parent Directory]`
//! anchor. [`links`] turns one listing body into absolute child URLs.
//!
//! The scraping strategy is private to this crate; callers only ever see
//! [`LinkEntry`] values.

mod consts;
mod link;

pub use crate::link::{LinkEntry, LinkKind, links};

/// Returns the final path segment of a URL (ignoring one trailing `/`).
///
/// ```rust
/// use specfetch_listing::last_segment;
/// assert_eq!(last_segment("https://example.org/archive/38_series/38.331"), "38.331");
/// assert_eq!(last_segment("https://example.org/archive/38_series/"), "38_series");
/// assert_eq!(last_segment("38331-e30.zip"), "38331-e30.zip");
/// ```
pub fn last_segment(url: &str) -> &str {
    let url = url.strip_suffix('/').unwrap_or(url);
    url.rsplit('/').next().unwrap_or(url)
}
