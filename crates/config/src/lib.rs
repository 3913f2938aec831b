//! Configuration for specfetch.
//!
//! Values are layered with [`figment`], later layers overriding earlier ones:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. `specfetch.{toml,yaml,yml,json}` in the user configuration directory,
//! 3. an explicitly requested configuration file,
//! 4. `SPECFETCH_*` environment variables (`SPECFETCH_WORKERS=4`).
//!
//! Command-line flags are applied on top by the binary.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "SPECFETCH_";
pub const DEFAULT_ARCHIVE_URL: &str = "https://www.3gpp.org/ftp/Specs/archive";
pub const DEFAULT_ETSI_URL: &str = "http://www.etsi.org/deliver/etsi_ts";
/// The archive refuses obviously scripted clients, so present as a browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/81.0.4044.129 Safari/537.36";

const FILE_STEM: &str = "specfetch";
const FILE_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of specification folders processed concurrently.
    pub workers: usize,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Root of the zip archive tree (`{archive_url}/{series}_series`).
    pub archive_url: String,
    /// Root of the PDF deliverables tree.
    pub etsi_url: String,
    pub connect_timeout_secs: u64,
    /// Upper bound for one folder's resolve, fetch and extract.
    pub task_timeout_secs: u64,
    pub convert_timeout_secs: u64,
    pub merge_timeout_secs: u64,
    /// Explicit merge executable; discovered from `PATH` when unset.
    pub merge_tool: Option<PathBuf>,
    pub extract_archives: bool,
    /// Delete the parts of a specification once they were merged.
    pub delete_originals: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            workers: 8,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            etsi_url: DEFAULT_ETSI_URL.to_string(),
            connect_timeout_secs: 30,
            task_timeout_secs: 900,
            convert_timeout_secs: 900,
            merge_timeout_secs: 120,
            merge_tool: None,
            extract_archives: true,
            delete_originals: false,
        }
    }
}

impl Config {
    /// Load the configuration from every layer, then validate it.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(user_config_files(), explicit)
    }

    /// Load the configuration from the given user files (lowest precedence
    /// first), an optional explicit file and the environment.
    pub fn load_from(user_files: impl IntoIterator<Item = PathBuf>, explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        for file in user_files {
            tracing::debug!(path = %file.display(), "Loading user configuration file");
            figment = merge_file(figment, &file)?;
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            figment = merge_file(figment, path)?;
        }
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Invalid)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field, reason| ErrorKind::Validation { field, reason };
        if self.workers == 0 {
            exn::bail!(invalid("workers", "must be at least 1"));
        }
        if self.user_agent.trim().is_empty() {
            exn::bail!(invalid("user_agent", "must not be empty"));
        }
        for (field, url) in [("archive_url", &self.archive_url), ("etsi_url", &self.etsi_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                exn::bail!(invalid(field, "must be an http(s) URL"));
            }
        }
        for (field, secs) in [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("task_timeout_secs", self.task_timeout_secs),
            ("convert_timeout_secs", self.convert_timeout_secs),
            ("merge_timeout_secs", self.merge_timeout_secs),
        ] {
            if secs == 0 {
                exn::bail!(invalid(field, "must be greater than zero"));
            }
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }

    pub fn convert_timeout(&self) -> Duration {
        Duration::from_secs(self.convert_timeout_secs)
    }

    pub fn merge_timeout(&self) -> Duration {
        Duration::from_secs(self.merge_timeout_secs)
    }
}

/// Existing `specfetch.*` files in the user configuration directory.
pub fn user_config_files() -> Vec<PathBuf> {
    let Some(dirs) = ProjectDirs::from("", "", FILE_STEM) else {
        tracing::debug!("No home directory; skipping user configuration");
        return Vec::new();
    };
    FILE_EXTENSIONS
        .iter()
        .map(|ext| dirs.config_dir().join(format!("{FILE_STEM}.{ext}")))
        .filter(|path| path.is_file())
        .collect()
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.workers, 8);
        assert_eq!(config.task_timeout(), Duration::from_secs(900));
        assert_eq!(config.merge_timeout(), Duration::from_secs(120));
        assert!(config.extract_archives);
        assert!(!config.delete_originals);
    }

    #[test]
    fn layers_override_in_order() {
        Jail::expect_with(|jail| {
            jail.create_file("user.toml", "workers = 2\nmerge_timeout_secs = 60")?;
            jail.create_file("explicit.yaml", "workers: 4\ndelete_originals: true")?;
            jail.set_env("SPECFETCH_WORKERS", "6");
            let config = Config::load_from([PathBuf::from("user.toml")], Some(Path::new("explicit.yaml"))).unwrap();
            assert_eq!(config.workers, 6);
            assert_eq!(config.merge_timeout_secs, 60);
            assert!(config.delete_originals);
            assert_eq!(config.archive_url, DEFAULT_ARCHIVE_URL);
            Ok(())
        });
    }

    #[test]
    fn json_files_are_supported() {
        Jail::expect_with(|jail| {
            jail.create_file("specfetch.json", r#"{"merge_tool": "/usr/bin/qpdf"}"#)?;
            let config = Config::load_from([], Some(Path::new("specfetch.json"))).unwrap();
            assert_eq!(config.merge_tool, Some(PathBuf::from("/usr/bin/qpdf")));
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file() {
        Jail::expect_with(|_jail| {
            let err = Config::load_from([], Some(Path::new("nope.toml"))).unwrap_err();
            assert_eq!(*err, ErrorKind::NotFound(PathBuf::from("nope.toml")));
            Ok(())
        });
    }

    #[test]
    fn unsupported_extension() {
        Jail::expect_with(|jail| {
            jail.create_file("specfetch.ini", "workers=1")?;
            let err = Config::load_from([], Some(Path::new("specfetch.ini"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
            Ok(())
        });
    }

    #[test]
    fn wrong_type_is_invalid() {
        Jail::expect_with(|jail| {
            jail.create_file("specfetch.toml", "workers = \"many\"")?;
            let err = Config::load_from([], Some(Path::new("specfetch.toml"))).unwrap_err();
            assert_eq!(*err, ErrorKind::Invalid);
            Ok(())
        });
    }

    #[rstest]
    #[case("workers = 0", "workers")]
    #[case("task_timeout_secs = 0", "task_timeout_secs")]
    #[case("merge_timeout_secs = 0", "merge_timeout_secs")]
    #[case("user_agent = \"  \"", "user_agent")]
    #[case("archive_url = \"ftp://www.3gpp.org\"", "archive_url")]
    fn validation(#[case] contents: &str, #[case] expected: &str) {
        Jail::expect_with(|jail| {
            jail.create_file("specfetch.toml", contents)?;
            let err = Config::load_from([], Some(Path::new("specfetch.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Validation { field, .. } if *field == expected));
            Ok(())
        });
    }
}
