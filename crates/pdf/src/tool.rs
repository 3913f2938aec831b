use crate::error::{ErrorKind, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Represents an external PDF merge executable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeTool {
    /// `sejda-console merge --files <in...> --output <out>`
    Sejda { path: PathBuf },
    /// `qpdf --empty --pages <in...> -- <out>`
    Qpdf { path: PathBuf },
    /// `pdfunite <in...> <out>`
    Pdfunite { path: PathBuf },
}
impl MergeTool {
    /// Search `PATH` for a supported merge tool, in order of preference.
    pub fn discover() -> Result<Self> {
        // Windows installs of sejda ship a batch wrapper instead of a binary.
        let executables = ["sejda-console", "sejda-console.bat", "qpdf", "pdfunite"];
        for exe in executables {
            if let Ok(path) = which::which(exe) {
                tracing::debug!(tool = %path.display(), "Discovered PDF merge tool");
                return Ok(Self::from_path(path));
            }
        }
        tracing::info!("No PDF merge tool found in PATH");
        exn::bail!(ErrorKind::MergeToolNotFound);
    }

    /// Wrap an explicitly configured executable, guessing its argument style
    /// from the file name. Unknown names are assumed to be sejda.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if stem.starts_with("qpdf") {
            Self::Qpdf { path }
        } else if stem.starts_with("pdfunite") {
            Self::Pdfunite { path }
        } else {
            Self::Sejda { path }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Sejda { path } | Self::Qpdf { path } | Self::Pdfunite { path } => path,
        }
    }

    /// Command-line arguments merging `inputs` (in order) into `output`.
    pub fn args(&self, inputs: &[PathBuf], output: &Path) -> Vec<OsString> {
        let inputs = inputs.iter().map(|input| input.as_os_str().to_os_string());
        let output = output.as_os_str().to_os_string();
        match self {
            Self::Sejda { .. } => ["merge", "--overwrite", "--files"]
                .into_iter()
                .map(OsString::from)
                .chain(inputs)
                .chain([OsString::from("--output"), output])
                .collect(),
            Self::Qpdf { .. } => ["--empty", "--pages"]
                .into_iter()
                .map(OsString::from)
                .chain(inputs)
                .chain([OsString::from("--"), output])
                .collect(),
            Self::Pdfunite { .. } => inputs.chain([output]).collect(),
        }
    }
}
