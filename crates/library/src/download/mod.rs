//! Concurrent download of specification folders.
//!
//! For every specification folder of a series the newest delivery for the
//! requested release is resolved, fetched into the destination directory
//! and, when it is an archive, extracted in place. Folders are processed as
//! spawned tasks with a bounded number in flight, each under an overall
//! timeout; one folder failing never affects its siblings.
//!
//! The primary entry point is [`download`], which crawls the series and
//! streams a [`DownloadEvent`] per folder. [`download_folder`] processes a
//! single folder.

pub mod error;
mod folder;
mod stream;

pub use self::folder::{Outcome, download_folder};
pub use self::stream::{DownloadEvent, dispatch, download};
