use clap::{ArgAction, Args, Parser, ValueEnum};
use specfetch_config::Config;
use specfetch_library::Layout;
use specfetch_release::Release;
use specfetch_release::error::ErrorKind as ReleaseErrorKind;
use std::path::PathBuf;

/// Download 3GPP specifications for one or more releases and series, then
/// optionally convert them to PDF and merge multi-part documents.
#[derive(Parser, Debug)]
#[command(name = "specfetch", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub mode: ModeArgs,

    /// Archive to download from: zipped Word documents or published PDFs
    #[arg(short, long, value_enum, default_value_t = FileType::Doc)]
    pub filetype: FileType,

    /// Release numbers (15 for the first NR release)
    #[arg(
        short = 'r',
        long = "release",
        value_name = "N",
        num_args = 1..,
        default_values = ["15"],
        allow_negative_numbers = true,
        value_parser = parse_release,
    )]
    pub releases: Vec<Release>,

    /// Series numbers (36 for LTE, 38 for NR)
    #[arg(
        short = 's',
        long = "series",
        value_name = "N",
        num_args = 1..,
        default_values = ["38"],
        value_parser = clap::value_parser!(u8).range(0..=99),
    )]
    pub series: Vec<u8>,

    /// Number of folders downloaded in parallel
    #[arg(short = 'm', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Directory the per-release folders are created in
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub path: PathBuf,

    /// Configuration file (toml, yaml or json)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep downloaded archives instead of unpacking them
    #[arg(long)]
    pub no_extract: bool,

    /// Delete the parts of a specification once merged
    #[arg(long)]
    pub delete_originals: bool,

    /// Merge executable (sejda-console, qpdf or pdfunite) to use
    #[arg(long, value_name = "PATH")]
    pub merge_tool: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
impl Cli {
    /// Command-line flags take precedence over every configuration layer.
    pub fn apply(&self, config: &mut Config) {
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.no_extract {
            config.extract_archives = false;
        }
        if self.delete_originals {
            config.delete_originals = true;
        }
        if let Some(tool) = &self.merge_tool {
            config.merge_tool = Some(tool.clone());
        }
    }

    /// `{series}Series_Rel{release}` below the output path.
    pub fn destination(&self, series: u8, release: Release) -> PathBuf {
        self.path.join(format!("{series}Series_Rel{release}"))
    }
}

#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct ModeArgs {
    /// Download, convert and merge
    #[arg(short, long)]
    pub all: bool,
    /// Download only (default)
    #[arg(short, long)]
    pub download: bool,
    /// Convert and merge what was downloaded earlier
    #[arg(short = 'c', long = "convert-merge")]
    pub convert_merge: bool,
}
impl ModeArgs {
    pub fn mode(&self) -> Mode {
        if self.all {
            Mode::All
        } else if self.convert_merge {
            Mode::ConvertMerge
        } else {
            Mode::Download
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    All,
    Download,
    ConvertMerge,
}
impl Mode {
    pub fn downloads(&self) -> bool {
        matches!(self, Self::All | Self::Download)
    }

    pub fn merges(&self) -> bool {
        matches!(self, Self::All | Self::ConvertMerge)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FileType {
    Doc,
    Pdf,
}
impl From<FileType> for Layout {
    fn from(value: FileType) -> Self {
        match value {
            FileType::Doc => Layout::Doc,
            FileType::Pdf => Layout::Pdf,
        }
    }
}

fn parse_release(value: &str) -> Result<Release, String> {
    value.parse::<Release>().map_err(|err| {
        let kind: &ReleaseErrorKind = &err;
        kind.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind as ClapErrorKind;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("specfetch").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.mode.mode(), Mode::Download);
        assert_eq!(cli.filetype, FileType::Doc);
        assert_eq!(cli.releases, vec![Release::try_from(15).unwrap()]);
        assert_eq!(cli.series, vec![38]);
        assert_eq!(cli.path, PathBuf::from("."));
        assert_eq!(cli.workers, None);
        assert_eq!(cli.verbose, 0);
    }

    #[rstest]
    #[case(&["-a"], Mode::All)]
    #[case(&["--all"], Mode::All)]
    #[case(&["-d"], Mode::Download)]
    #[case(&["-c"], Mode::ConvertMerge)]
    #[case(&["--convert-merge"], Mode::ConvertMerge)]
    fn modes(#[case] args: &[&str], #[case] expected: Mode) {
        assert_eq!(parse(args).unwrap().mode.mode(), expected);
    }

    #[test]
    fn modes_are_exclusive() {
        let err = parse(&["-a", "-c"]).unwrap_err();
        assert_eq!(err.kind(), ClapErrorKind::ArgumentConflict);
    }

    #[test]
    fn multiple_releases_and_series() {
        let cli = parse(&["-r", "15", "16", "-s", "38", "36", "-f", "pdf", "-p", "/tmp/specs", "-vv"]).unwrap();
        let releases: Vec<_> = cli.releases.iter().map(Release::number).collect();
        assert_eq!(releases, vec![15, 16]);
        assert_eq!(cli.series, vec![38, 36]);
        assert_eq!(Layout::from(cli.filetype), Layout::Pdf);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.destination(36, cli.releases[1]),
            PathBuf::from("/tmp/specs/36Series_Rel16")
        );
    }

    #[rstest]
    #[case("36")]
    #[case("-1")]
    #[case("fifteen")]
    fn invalid_release_is_rejected(#[case] release: &str) {
        let err = parse(&["-r", release]).unwrap_err();
        assert_eq!(err.kind(), ClapErrorKind::ValueValidation);
    }

    #[test]
    fn invalid_series_is_rejected() {
        let err = parse(&["-s", "138"]).unwrap_err();
        assert_eq!(err.kind(), ClapErrorKind::ValueValidation);
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&["-m", "3", "--no-extract", "--delete-originals", "--merge-tool", "/opt/qpdf"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.workers, 3);
        assert!(!config.extract_archives);
        assert!(config.delete_originals);
        assert_eq!(config.merge_tool, Some(PathBuf::from("/opt/qpdf")));
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = parse(&[]).unwrap();
        let mut config = Config {
            workers: 5,
            ..Config::default()
        };
        cli.apply(&mut config);
        assert_eq!(config, Config { workers: 5, ..Config::default() });
    }

    #[test]
    fn command_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
