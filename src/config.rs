//! Runtime configuration.
//!
//! Settings come from an optional TOML file and are overridden by CLI flags
//! or their environment variables:
//!
//! ```toml
//! [jira]
//! server = "https://company.atlassian.net"
//! username = "me@company.com"
//! api_token = "..."
//! project_key = "PRJ"
//!
//! [output]
//! dir = "reports"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::args::Args;
use crate::utils::constants::{
    DEFAULT_CONFIG_PATH, MAX_RESULTS, RELEASE_FILE, RELEASE_SHEET, SPRINT_FILE, SPRINT_SHEET,
};
use crate::utils::query::Scope;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("missing JIRA setting `{0}` (set it in the config file, as a flag or in the environment)")]
    Missing(&'static str),

    #[error("max_results must be between 1 and {max}, got {0}", max = MAX_RESULTS)]
    MaxResults(u32),
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    jira: JiraSection,

    #[serde(default)]
    output: OutputSection,
}

#[derive(Debug, Default, Deserialize)]
struct JiraSection {
    server: Option<String>,
    username: Option<String>,
    api_token: Option<String>,
    project_key: Option<String>,
    max_results: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputSection {
    dir: Option<PathBuf>,
    sprint_file: Option<String>,
    sprint_sheet: Option<String>,
    release_file: Option<String>,
    release_sheet: Option<String>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jira: JiraConfig,
    pub output: OutputConfig,
}

#[derive(Clone)]
pub struct JiraConfig {
    pub server: String,
    pub username: String,
    pub api_token: String,
    pub project_key: String,
    pub max_results: u32,
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraConfig")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("api_token", &"<redacted>")
            .field("project_key", &self.project_key)
            .field("max_results", &self.max_results)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub sprint_file: String,
    pub sprint_sheet: String,
    pub release_file: String,
    pub release_sheet: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            sprint_file: SPRINT_FILE.to_string(),
            sprint_sheet: SPRINT_SHEET.to_string(),
            release_file: RELEASE_FILE.to_string(),
            release_sheet: RELEASE_SHEET.to_string(),
        }
    }
}

impl OutputConfig {
    /// Output file and sheet name for a scope.
    pub fn target(&self, scope: &Scope) -> (PathBuf, &str) {
        match scope {
            Scope::Sprint(_) => (self.dir.join(&self.sprint_file), self.sprint_sheet.as_str()),
            Scope::Release(_) => (self.dir.join(&self.release_file), self.release_sheet.as_str()),
        }
    }
}

impl Config {
    /// Reads `--config` (or `jira.toml` if it exists) and applies flags on top.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => ConfigFile::read(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    ConfigFile::read(default)?
                } else {
                    ConfigFile::default()
                }
            }
        };
        Self::merge(file, args)
    }

    fn merge(file: ConfigFile, args: &Args) -> Result<Self, ConfigError> {
        let ConfigFile { jira, output } = file;

        let max_results = args.max_results.or(jira.max_results).unwrap_or(MAX_RESULTS);
        if max_results == 0 || max_results > MAX_RESULTS {
            return Err(ConfigError::MaxResults(max_results));
        }

        let server = pick(&args.server, jira.server, "server")?;
        let jira = JiraConfig {
            server: server.trim_end_matches('/').to_string(),
            username: pick(&args.username, jira.username, "username")?,
            api_token: pick(&args.api_token, jira.api_token, "api_token")?,
            project_key: pick(&args.project_key, jira.project_key, "project_key")?,
            max_results,
        };

        let defaults = OutputConfig::default();
        let output = OutputConfig {
            dir: args.output_dir.clone().or(output.dir).unwrap_or(defaults.dir),
            sprint_file: output.sprint_file.unwrap_or(defaults.sprint_file),
            sprint_sheet: output.sprint_sheet.unwrap_or(defaults.sprint_sheet),
            release_file: output.release_file.unwrap_or(defaults.release_file),
            release_sheet: output.release_sheet.unwrap_or(defaults.release_sheet),
        };

        Ok(Self { jira, output })
    }
}

fn pick(
    flag: &Option<String>,
    file: Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    let present = |value: &String| !value.trim().is_empty();
    flag.clone()
        .filter(present)
        .or(file.filter(present))
        .ok_or(ConfigError::Missing(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::parse_without_env;

    const FULL: &str = r#"
        [jira]
        server = "https://company.atlassian.net/"
        username = "dana@company.com"
        api_token = "file-token"
        project_key = "PRJ"

        [output]
        dir = "reports"
        release_sheet = "releases"
    "#;

    fn args(argv: &[&str]) -> Args {
        parse_without_env(argv)
    }

    fn file(text: &str) -> ConfigFile {
        ConfigFile::parse(text, Path::new("jira.toml")).unwrap()
    }

    #[test]
    fn file_values_fill_config() {
        let config = Config::merge(file(FULL), &args(&[])).unwrap();

        assert_eq!(config.jira.server, "https://company.atlassian.net");
        assert_eq!(config.jira.project_key, "PRJ");
        assert_eq!(config.jira.max_results, MAX_RESULTS);
        assert_eq!(config.output.dir, PathBuf::from("reports"));
        assert_eq!(config.output.release_sheet, "releases");
        assert_eq!(config.output.sprint_file, "Sprint_Issues.xlsx");
    }

    #[test]
    fn flags_override_file_values() {
        let config = Config::merge(
            file(FULL),
            &args(&["--project-key", "OPS", "--output-dir", "/tmp/out", "--max-results", "50"]),
        )
        .unwrap();

        assert_eq!(config.jira.project_key, "OPS");
        assert_eq!(config.jira.username, "dana@company.com");
        assert_eq!(config.jira.max_results, 50);
        assert_eq!(config.output.dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn missing_setting_is_reported_by_name() {
        let partial = file(
            r#"
            [jira]
            server = "https://company.atlassian.net"
            username = "dana@company.com"
            api_token = "t"
            project_key = ""
            "#,
        );
        let err = Config::merge(partial, &args(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("project_key")));
    }

    #[test]
    fn empty_flag_falls_back_to_file_value() {
        let config = Config::merge(file(FULL), &args(&["--project-key", "", "--server", "  "]))
            .unwrap();

        assert_eq!(config.jira.project_key, "PRJ");
        assert_eq!(config.jira.server, "https://company.atlassian.net");
    }

    #[test]
    fn empty_flag_without_file_value_is_missing() {
        let err = Config::merge(ConfigFile::default(), &args(&[
            "--server",
            "https://company.atlassian.net",
            "--username",
            "dana@company.com",
            "--api-token",
            "t",
            "--project-key",
            "",
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("project_key")));
    }

    #[test]
    fn max_results_over_cap_in_file_is_rejected() {
        let text = FULL.replace(
            "project_key = \"PRJ\"",
            "project_key = \"PRJ\"\nmax_results = 2500",
        );
        let err = Config::merge(file(&text), &args(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MaxResults(2500)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = ConfigFile::parse("[jira\nserver = ", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = ConfigFile::read(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn debug_output_hides_api_token() {
        let config = Config::merge(file(FULL), &args(&[])).unwrap();
        let printed = format!("{:?}", config);

        assert!(!printed.contains("file-token"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn targets_follow_scope() {
        let output = OutputConfig::default();

        let (path, sheet) = output.target(&Scope::Sprint("1".into()));
        assert_eq!(path, PathBuf::from("./Sprint_Issues.xlsx"));
        assert_eq!(sheet, "sprint_Issues");

        let (path, sheet) = output.target(&Scope::Release("Release One".into()));
        assert_eq!(path, PathBuf::from("./Release_Issues.xlsx"));
        assert_eq!(sheet, "release_Issues");
    }
}
