//! Regrouping and merging of multi-part specifications.
//!
//! Large specifications are delivered as several files sharing an identifier
//! (`38801-100_cover.pdf`, `38801-200_part1.pdf`). [`group_files`] finds those
//! groups in a directory listing and orders them cover first; [`merge`] hands
//! each group to a [`Merge`](specfetch_pdf::Merge) implementation, producing
//! `38801.pdf` next to the parts.

mod group;
pub(crate) mod stream;

pub use self::group::{SpecificationGroup, group_files, identifier};
pub use self::stream::{MergeEvent, MergeOptions, Merged, merge, merge_group};
