use crate::MergeTool;
use crate::error::{ErrorKind, Result};
use crate::process::run;
use async_trait::async_trait;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::instrument;

/// Anything that can combine an ordered list of PDFs into one file.
#[async_trait]
pub trait Merge: Send + Sync {
    /// Merge `inputs`, in order, into `output`.
    ///
    /// On error, `output` must not have been created or modified.
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;
}

/// Runs an external [`MergeTool`].
///
/// The tool writes into a temporary file next to the output, which is only
/// renamed into place once the tool exits successfully.
#[derive(Clone, Debug)]
pub struct Merger {
    tool: MergeTool,
    timeout: Duration,
}
impl Merger {
    pub fn new(tool: MergeTool, timeout: Duration) -> Self {
        Self { tool, timeout }
    }

    /// Use the first merge tool found in `PATH`.
    pub fn discover(timeout: Duration) -> Result<Self> {
        Ok(Self::new(MergeTool::discover()?, timeout))
    }

    pub fn tool(&self) -> &MergeTool {
        &self.tool
    }
}

#[async_trait]
impl Merge for Merger {
    #[instrument(skip_all, fields(tool = %self.tool.path().display(), inputs = inputs.len(), output = %output.display()))]
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        let directory = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staging = tempfile::Builder::new()
            .prefix(".merge-")
            .suffix(".pdf")
            .tempfile_in(directory)
            .or_raise(|| ErrorKind::Io)?;
        let mut command = Command::new(self.tool.path());
        command.args(self.tool.args(inputs, staging.path()));
        run(command, self.timeout).await?;
        staging.persist(output).or_raise(|| ErrorKind::Io)?;
        tracing::info!("PDF merged");
        Ok(())
    }
}
