use crate::error::{ErrorKind, Result};
use crate::process::run;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::instrument;

const CONVERTIBLE_EXTENSIONS: [&str; 2] = ["doc", "docx"];

/// Returns `true` for Word documents (`.doc`, `.docx`).
pub fn is_convertible(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CONVERTIBLE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Outcome of converting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// A new PDF was written.
    Converted(PathBuf),
    /// A PDF for the document already existed; nothing was done.
    AlreadyExists(PathBuf),
}
impl Conversion {
    pub fn pdf(&self) -> &Path {
        match self {
            Self::Converted(path) | Self::AlreadyExists(path) => path,
        }
    }
}

/// Word-to-PDF conversion capability, selected once at startup.
///
/// The rest of the pipeline only relies on "document path in, PDF path out";
/// it never cares which variant is active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentConverter {
    /// A LibreOffice executable, run headless.
    Office { path: PathBuf, timeout: Duration },
    /// No office suite on this system.
    Unavailable,
}
impl DocumentConverter {
    /// Search `PATH` for an office suite able to export PDFs.
    pub fn discover(timeout: Duration) -> Self {
        let executables = ["soffice", "libreoffice", "lowriter"];
        for exe in executables {
            if let Ok(path) = which::which(exe) {
                tracing::debug!(converter = %path.display(), "Discovered document converter");
                return Self::Office { path, timeout };
            }
        }
        tracing::info!("No office suite found in PATH; document conversion disabled");
        Self::Unavailable
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Office { .. })
    }

    /// Convert a Word document into a PDF alongside it.
    ///
    /// Documents whose PDF already exists are skipped.
    #[instrument(skip(self), fields(input = %input.display()))]
    pub async fn convert(&self, input: &Path) -> Result<Conversion> {
        if !is_convertible(input) {
            exn::bail!(ErrorKind::UnsupportedInput(input.to_path_buf()));
        }
        let output = input.with_extension("pdf");
        if output.exists() {
            tracing::debug!("PDF already exists; skipping conversion");
            return Ok(Conversion::AlreadyExists(output));
        }
        let Self::Office { path, timeout } = self else {
            exn::bail!(ErrorKind::ConverterUnavailable);
        };
        let directory = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // Concurrent LibreOffice instances sharing one profile block each other.
        let profile = tempfile::tempdir().or_raise(|| ErrorKind::Io)?;
        let mut command = Command::new(path);
        command
            .arg(format!("-env:UserInstallation=file://{}", profile.path().display()))
            .args(["--headless", "--convert-to", "pdf", "--outdir"])
            .arg(directory)
            .arg(input);
        run(command, *timeout).await?;
        if !output.exists() {
            exn::bail!(ErrorKind::MissingOutput(output));
        }
        tracing::info!(output = %output.display(), "Document converted to PDF");
        Ok(Conversion::Converted(output))
    }
}
