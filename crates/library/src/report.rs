use crate::error::{Error, ErrorKind, Result};
use futures::{Stream, StreamExt};
use std::pin::pin;

/// A progress event that may carry one finished unit of work.
pub trait Event {
    type Item;
    /// The finished item, if this event represents one.
    fn finished(self) -> Option<Self::Item>;
}

/// Outcome of draining a pipeline stream: everything that finished and
/// everything that failed. Failures never abort a batch.
#[derive(Debug)]
pub struct Report<T> {
    pub completed: Vec<T>,
    pub failures: Vec<Error>,
}
impl<T> Default for Report<T> {
    fn default() -> Self {
        Self {
            completed: Vec::new(),
            failures: Vec::new(),
        }
    }
}
impl<T> Report<T> {
    /// Drain a progress stream, sorting finished items from failures.
    pub async fn collect<E, S>(stream: S) -> Self
    where
        E: Event<Item = T>,
        S: Stream<Item = Result<E>>,
    {
        let mut report = Self::default();
        let mut stream = pin!(stream);
        while let Some(event) = stream.next().await {
            match event {
                Ok(event) => report.completed.extend(event.finished()),
                Err(error) => {
                    let kind: &ErrorKind = &error;
                    tracing::warn!(error = %kind, "Task failed");
                    tracing::debug!("{error:?}");
                    report.failures.push(error);
                },
            }
        }
        report
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
