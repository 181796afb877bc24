use std::fs;
use std::time::Duration;

use camino::Utf8PathBuf;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::{ALL_LANGUAGES, RatioPolicy};
use crate::error::ReportError;
use crate::format::DEFAULT_DELIMITER;
use crate::steam::DEFAULT_STORE_BASE_URL;
use crate::throttle::{DEFAULT_FAILURE_COOLDOWN, DEFAULT_REQUEST_INTERVAL, Throttler};

pub const CONFIG_FILE_NAME: &str = "steam-review-report.json";
pub const DEFAULT_INPUT: &str = "appId.csv";
pub const DEFAULT_OUTPUT: &str = "sample.csv";
pub const DEFAULT_TARGET_LANGUAGE: &str = "japanese";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub request_interval_ms: Option<u64>,
    #[serde(default)]
    pub failure_cooldown_ms: Option<u64>,
    #[serde(default)]
    pub ratio_policy: Option<RatioPolicy>,
    #[serde(default)]
    pub store_base_url: Option<String>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<String>,
    pub output: Option<String>,
    pub target_language: Option<String>,
    pub delimiter: Option<String>,
    pub ratio_policy: Option<RatioPolicy>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub input: Utf8PathBuf,
    pub output: Utf8PathBuf,
    pub target_language: String,
    pub delimiter: char,
    pub request_interval: Duration,
    pub failure_cooldown: Duration,
    pub ratio_policy: RatioPolicy,
    pub store_base_url: String,
}

impl ResolvedConfig {
    pub fn throttler(&self) -> Throttler {
        Throttler::new(self.request_interval, self.failure_cooldown)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the config file (explicit path, working directory, then the user
    /// config directory), falling back to defaults when none exists.
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, ReportError> {
        let config = match Self::locate(path)? {
            Some(config_path) => {
                let content = fs::read_to_string(config_path.as_std_path())
                    .map_err(|_| ReportError::ConfigRead(config_path.clone()))?;
                serde_json::from_str(&content)
                    .map_err(|err| ReportError::ConfigParse(err.to_string()))?
            }
            None => Config::default(),
        };

        Self::resolve_config(config, overrides)
    }

    fn locate(path: Option<&str>) -> Result<Option<Utf8PathBuf>, ReportError> {
        if let Some(path) = path {
            let explicit = Utf8PathBuf::from(path);
            if !explicit.as_std_path().exists() {
                return Err(ReportError::MissingConfig(explicit));
            }
            return Ok(Some(explicit));
        }

        let local = Utf8PathBuf::from(CONFIG_FILE_NAME);
        if local.as_std_path().exists() {
            return Ok(Some(local));
        }

        Ok(user_config_path().filter(|path| path.as_std_path().exists()))
    }

    pub fn resolve_config(
        config: Config,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, ReportError> {
        let schema_version = config.schema_version.unwrap_or(1);
        if schema_version != 1 {
            return Err(ReportError::InvalidConfig(format!(
                "unsupported schema_version {schema_version}"
            )));
        }

        let delimiter = match overrides.delimiter.or(config.delimiter) {
            Some(value) => parse_delimiter(&value)?,
            None => DEFAULT_DELIMITER,
        };

        let target_language = overrides
            .target_language
            .or(config.target_language)
            .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string())
            .trim()
            .to_lowercase();
        validate_language(&target_language)?;

        let input = overrides
            .input
            .or(config.input)
            .unwrap_or_else(|| DEFAULT_INPUT.to_string());
        let output = overrides
            .output
            .or(config.output)
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

        Ok(ResolvedConfig {
            schema_version,
            input: Utf8PathBuf::from(input),
            output: Utf8PathBuf::from(output),
            target_language,
            delimiter,
            request_interval: config
                .request_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REQUEST_INTERVAL),
            failure_cooldown: config
                .failure_cooldown_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_FAILURE_COOLDOWN),
            ratio_policy: overrides
                .ratio_policy
                .or(config.ratio_policy)
                .unwrap_or_default(),
            store_base_url: config
                .store_base_url
                .unwrap_or_else(|| DEFAULT_STORE_BASE_URL.to_string()),
        })
    }
}

pub fn user_config_path() -> Option<Utf8PathBuf> {
    ProjectDirs::from("", "", "steam-review-report").and_then(|dirs| {
        Utf8PathBuf::from_path_buf(dirs.config_dir().join("config.json")).ok()
    })
}

fn parse_delimiter(value: &str) -> Result<char, ReportError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch != '"' && !ch.is_whitespace() => Ok(ch),
        _ => Err(ReportError::InvalidConfig(format!(
            "delimiter must be a single non-whitespace character other than a quote, got {value:?}"
        ))),
    }
}

fn validate_language(language: &str) -> Result<(), ReportError> {
    let is_token = !language.is_empty()
        && language
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if !is_token || language == ALL_LANGUAGES {
        return Err(ReportError::InvalidConfig(format!(
            "target language must be a single language token, got {language:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn defaults_when_config_is_empty() {
        let resolved =
            ConfigLoader::resolve_config(Config::default(), ConfigOverrides::default()).unwrap();
        assert_eq!(resolved.schema_version, 1);
        assert_eq!(resolved.input, Utf8PathBuf::from("appId.csv"));
        assert_eq!(resolved.output, Utf8PathBuf::from("sample.csv"));
        assert_eq!(resolved.target_language, "japanese");
        assert_eq!(resolved.delimiter, '.');
        assert_eq!(resolved.request_interval, Duration::from_secs(1));
        assert_eq!(resolved.failure_cooldown, Duration::from_secs(10));
        assert_eq!(resolved.ratio_policy, RatioPolicy::PassThrough);
        assert_eq!(resolved.store_base_url, DEFAULT_STORE_BASE_URL);
    }

    #[test]
    fn overrides_win_over_file() {
        let config = Config {
            delimiter: Some("|".to_string()),
            target_language: Some("german".to_string()),
            ..Config::default()
        };
        let overrides = ConfigOverrides {
            delimiter: Some("/".to_string()),
            ..ConfigOverrides::default()
        };
        let resolved = ConfigLoader::resolve_config(config, overrides).unwrap();
        assert_eq!(resolved.delimiter, '/');
        assert_eq!(resolved.target_language, "german");
    }

    #[test]
    fn rejects_multi_char_delimiter() {
        let config = Config {
            delimiter: Some("::".to_string()),
            ..Config::default()
        };
        let err = ConfigLoader::resolve_config(config, ConfigOverrides::default()).unwrap_err();
        assert_matches!(err, ReportError::InvalidConfig(_));
    }

    #[test]
    fn rejects_whitespace_delimiter() {
        for delimiter in [" ", "\t", "\n"] {
            let config = Config {
                delimiter: Some(delimiter.to_string()),
                ..Config::default()
            };
            let err =
                ConfigLoader::resolve_config(config, ConfigOverrides::default()).unwrap_err();
            assert_matches!(err, ReportError::InvalidConfig(_));
        }
    }

    #[test]
    fn rejects_all_as_target_language() {
        let overrides = ConfigOverrides {
            target_language: Some("All".to_string()),
            ..ConfigOverrides::default()
        };
        let err = ConfigLoader::resolve_config(Config::default(), overrides).unwrap_err();
        assert_matches!(err, ReportError::InvalidConfig(_));
    }

    #[test]
    fn parses_kebab_case_policy() {
        let config: Config =
            serde_json::from_str(r#"{"ratio_policy": "mark-unavailable", "request_interval_ms": 0}"#)
                .unwrap();
        let resolved = ConfigLoader::resolve_config(config, ConfigOverrides::default()).unwrap();
        assert_eq!(resolved.ratio_policy, RatioPolicy::MarkUnavailable);
        assert_eq!(resolved.request_interval, Duration::ZERO);
    }
}
