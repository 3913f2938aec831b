use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Run an external tool to completion within `timeout`.
///
/// The child is killed if the time limit is reached.
pub(crate) async fn run(mut command: Command, timeout: Duration) -> Result<()> {
    command.kill_on_drop(true).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::piped());
    tracing::debug!(command = ?command.as_std(), "Running external tool");
    let child = command.spawn().or_raise(|| ErrorKind::Io)?;
    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .or_raise(|| ErrorKind::Timeout)?
        .or_raise(|| ErrorKind::Io)?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    tracing::warn!(status = %output.status, stderr = %stderr.trim(), "External tool failed");
    match output.status.code() {
        Some(code) => exn::bail!(ErrorKind::Failed(code)),
        None => exn::bail!(ErrorKind::Terminated),
    }
}
