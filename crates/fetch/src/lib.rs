pub mod backend;
pub mod error;

pub use crate::backend::Fetcher;
use std::sync::Arc;

pub type FetcherHandle = Arc<dyn Fetcher + Send + Sync>;
