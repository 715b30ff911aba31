use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rollcall_core::extract::ExtractOptions;
use rollcall_core::settle::{SettleMode, SettlePolicy};
use rollcall_core::{LookupStrategy, SelectorSet, MIN_PHONE_LENGTH};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "rollcall";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub min_length: usize,
    pub settle: SettlePolicy,
    pub selectors: SelectorSet,
    pub clipboard: ClipboardConfig,
    pub acknowledge: AcknowledgeBackend,
    pub webdriver: WebDriverConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardConfig {
    pub enabled: bool,
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcknowledgeBackend {
    Prompt,
    Stdout,
    Desktop,
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebDriverConfig {
    pub url: Option<String>,
    pub page_url: Option<String>,
    pub wait_for: Option<String>,
    pub login_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            min_length: MIN_PHONE_LENGTH,
            settle: SettlePolicy::default(),
            selectors: SelectorSet::default(),
            clipboard: ClipboardConfig {
                enabled: true,
                command: None,
            },
            acknowledge: AcknowledgeBackend::Prompt,
            webdriver: WebDriverConfig {
                url: None,
                page_url: None,
                wait_for: None,
                login_timeout_secs: DEFAULT_LOGIN_TIMEOUT_SECS,
            },
        }
    }
}

impl AppConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            selectors: self.selectors.clone(),
            settle: self.settle,
            min_length: self.min_length,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid min_length value: {0}")]
    InvalidMinLength(usize),
    #[error("invalid settle.poll_interval_ms value: {0}")]
    InvalidPollInterval(u64),
    #[error("invalid {field}: selectors cannot be empty")]
    EmptySelector { field: &'static str },
    #[error("invalid selectors.panel entry: strategy name cannot be empty")]
    EmptyStrategyName,
    #[error("duplicate selectors.panel strategy name: {0}")]
    DuplicateStrategyName(String),
    #[error("invalid clipboard.command: command cannot be empty")]
    EmptyClipboardCommand,
    #[error("invalid webdriver.{field}: value cannot be empty")]
    InvalidWebDriverField { field: &'static str },
    #[error("invalid webdriver.login_timeout_secs value: {0}")]
    InvalidLoginTimeout(u64),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    min_length: Option<usize>,
    settle: Option<SettleFile>,
    selectors: Option<SelectorsFile>,
    clipboard: Option<ClipboardFile>,
    acknowledge: Option<AcknowledgeFile>,
    webdriver: Option<WebDriverFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettleFile {
    mode: Option<SettleMode>,
    after_activation_ms: Option<u64>,
    render_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SelectorsFile {
    panel: Option<Vec<StrategyFile>>,
    targeted: Option<Vec<String>>,
    ready: Option<Vec<String>>,
    copyable: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StrategyFile {
    name: String,
    selector: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClipboardFile {
    enabled: Option<bool>,
    command: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AcknowledgeFile {
    backend: Option<AcknowledgeBackend>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct WebDriverFile {
    url: Option<String>,
    page_url: Option<String>,
    wait_for: Option<String>,
    login_timeout_secs: Option<u64>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(min_length) = parsed.min_length {
        if min_length < 2 {
            return Err(ConfigError::InvalidMinLength(min_length));
        }
        config.min_length = min_length;
    }

    if let Some(settle) = parsed.settle {
        merge_settle(&mut config.settle, settle)?;
    }

    if let Some(selectors) = parsed.selectors {
        merge_selectors(&mut config.selectors, selectors)?;
    }

    if let Some(clipboard) = parsed.clipboard {
        if let Some(enabled) = clipboard.enabled {
            config.clipboard.enabled = enabled;
        }
        if let Some(command) = clipboard.command {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                return Err(ConfigError::EmptyClipboardCommand);
            }
            config.clipboard.command = Some(command);
        }
    }

    if let Some(acknowledge) = parsed.acknowledge {
        if let Some(backend) = acknowledge.backend {
            config.acknowledge = backend;
        }
    }

    if let Some(webdriver) = parsed.webdriver {
        config.webdriver.url = non_empty(webdriver.url, "url")?;
        config.webdriver.page_url = non_empty(webdriver.page_url, "page_url")?;
        config.webdriver.wait_for = non_empty(webdriver.wait_for, "wait_for")?;
        if let Some(timeout) = webdriver.login_timeout_secs {
            if timeout == 0 {
                return Err(ConfigError::InvalidLoginTimeout(timeout));
            }
            config.webdriver.login_timeout_secs = timeout;
        }
    }

    Ok(config)
}

fn merge_settle(policy: &mut SettlePolicy, parsed: SettleFile) -> Result<()> {
    if let Some(mode) = parsed.mode {
        policy.mode = mode;
    }
    if let Some(ms) = parsed.after_activation_ms {
        policy.after_activation = Duration::from_millis(ms);
    }
    if let Some(ms) = parsed.render_ms {
        policy.render = Duration::from_millis(ms);
    }
    if let Some(ms) = parsed.poll_interval_ms {
        if ms == 0 {
            return Err(ConfigError::InvalidPollInterval(ms));
        }
        policy.poll_interval = Duration::from_millis(ms);
    }
    Ok(())
}

fn merge_selectors(set: &mut SelectorSet, parsed: SelectorsFile) -> Result<()> {
    if let Some(panel) = parsed.panel {
        let mut strategies: Vec<LookupStrategy> = Vec::with_capacity(panel.len());
        for entry in panel {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(ConfigError::EmptyStrategyName);
            }
            if strategies.iter().any(|existing| existing.name == name) {
                return Err(ConfigError::DuplicateStrategyName(name.to_string()));
            }
            let selector = entry.selector.trim();
            if selector.is_empty() {
                return Err(ConfigError::EmptySelector {
                    field: "selectors.panel",
                });
            }
            strategies.push(LookupStrategy::new(name, selector));
        }
        set.panel = strategies;
    }
    if let Some(targeted) = parsed.targeted {
        set.targeted = clean_selectors(targeted, "selectors.targeted")?;
    }
    if let Some(ready) = parsed.ready {
        set.ready = clean_selectors(ready, "selectors.ready")?;
    }
    if let Some(copyable) = parsed.copyable {
        set.copyable = clean_selectors(copyable, "selectors.copyable")?;
    }
    Ok(())
}

fn clean_selectors(raw: Vec<String>, field: &'static str) -> Result<Vec<String>> {
    raw.into_iter()
        .map(|selector| {
            let trimmed = selector.trim();
            if trimmed.is_empty() {
                Err(ConfigError::EmptySelector { field })
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

fn non_empty(value: Option<String>, field: &'static str) -> Result<Option<String>> {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidWebDriverField { field });
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        load_at_path, merge_config, AcknowledgeBackend, ClipboardFile, ConfigError, ConfigFile,
        SelectorsFile, SettleFile, StrategyFile, WebDriverFile,
    };
    use rollcall_core::settle::SettleMode;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            min_length: Some(12),
            settle: Some(SettleFile {
                mode: Some(SettleMode::Fixed),
                after_activation_ms: Some(500),
                render_ms: None,
                poll_interval_ms: Some(100),
            }),
            selectors: Some(SelectorsFile {
                panel: Some(vec![StrategyFile {
                    name: "menu".to_string(),
                    selector: " #menu ".to_string(),
                }]),
                ..SelectorsFile::default()
            }),
            ..ConfigFile::default()
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.min_length, 12);
        assert_eq!(merged.settle.mode, SettleMode::Fixed);
        assert_eq!(merged.settle.after_activation, Duration::from_millis(500));
        assert_eq!(merged.settle.render, Duration::from_millis(2000));
        assert_eq!(merged.selectors.panel.len(), 1);
        assert_eq!(merged.selectors.panel[0].selector, "#menu");
        assert_eq!(merged.selectors.targeted.len(), 5);
    }

    #[test]
    fn merge_config_rejects_empty_selectors() {
        let parsed = ConfigFile {
            selectors: Some(SelectorsFile {
                targeted: Some(vec!["span".to_string(), "  ".to_string()]),
                ..SelectorsFile::default()
            }),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(err.to_string().contains("selectors.targeted"));
    }

    #[test]
    fn merge_config_rejects_duplicate_strategy_names() {
        let parsed = ConfigFile {
            selectors: Some(SelectorsFile {
                panel: Some(vec![
                    StrategyFile {
                        name: "menu".to_string(),
                        selector: "#a".to_string(),
                    },
                    StrategyFile {
                        name: "menu".to_string(),
                        selector: "#b".to_string(),
                    },
                ]),
                ..SelectorsFile::default()
            }),
            ..ConfigFile::default()
        };
        assert!(merge_config(parsed).is_err());
    }

    #[test]
    fn merge_config_rejects_zero_poll_interval() {
        let parsed = ConfigFile {
            settle: Some(SettleFile {
                poll_interval_ms: Some(0),
                ..SettleFile::default()
            }),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn merge_config_rejects_short_min_length() {
        let parsed = ConfigFile {
            min_length: Some(1),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMinLength(1)));

        let parsed = ConfigFile {
            min_length: Some(2),
            ..ConfigFile::default()
        };
        assert_eq!(merge_config(parsed).expect("merge").min_length, 2);
    }

    #[test]
    fn merge_config_rejects_blank_strategy_name() {
        let parsed = ConfigFile {
            selectors: Some(SelectorsFile {
                panel: Some(vec![StrategyFile {
                    name: "   ".to_string(),
                    selector: "#menu".to_string(),
                }]),
                ..SelectorsFile::default()
            }),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyStrategyName));
    }

    #[test]
    fn merge_config_rejects_empty_clipboard_command() {
        for command in [Vec::new(), vec![" ".to_string(), "-i".to_string()]] {
            let parsed = ConfigFile {
                clipboard: Some(ClipboardFile {
                    enabled: None,
                    command: Some(command),
                }),
                ..ConfigFile::default()
            };
            let err = merge_config(parsed).unwrap_err();
            assert!(matches!(err, ConfigError::EmptyClipboardCommand));
        }
    }

    #[test]
    fn merge_config_rejects_blank_webdriver_fields() {
        let cases: [(&str, WebDriverFile); 3] = [
            (
                "url",
                WebDriverFile {
                    url: Some(String::new()),
                    ..WebDriverFile::default()
                },
            ),
            (
                "page_url",
                WebDriverFile {
                    page_url: Some("  ".to_string()),
                    ..WebDriverFile::default()
                },
            ),
            (
                "wait_for",
                WebDriverFile {
                    wait_for: Some("\t".to_string()),
                    ..WebDriverFile::default()
                },
            ),
        ];
        for (expected, webdriver) in cases {
            let parsed = ConfigFile {
                webdriver: Some(webdriver),
                ..ConfigFile::default()
            };
            match merge_config(parsed).unwrap_err() {
                ConfigError::InvalidWebDriverField { field } => assert_eq!(field, expected),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn merge_config_rejects_zero_login_timeout() {
        let parsed = ConfigFile {
            webdriver: Some(WebDriverFile {
                login_timeout_secs: Some(0),
                ..WebDriverFile::default()
            }),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLoginTimeout(0)));
    }

    #[test]
    fn merge_config_trims_webdriver_fields() {
        let parsed = ConfigFile {
            webdriver: Some(WebDriverFile {
                url: Some(" http://localhost:4444 ".to_string()),
                login_timeout_secs: Some(30),
                ..WebDriverFile::default()
            }),
            ..ConfigFile::default()
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.webdriver.url.as_deref(), Some("http://localhost:4444"));
        assert_eq!(merged.webdriver.page_url, None);
        assert_eq!(merged.webdriver.login_timeout_secs, 30);
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
    }

    #[test]
    fn load_at_path_skips_missing_optional_file() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        assert!(load_at_path(&missing, false).expect("load").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "min_length = 11\n\
             [settle]\nmode = \"poll\"\nrender_ms = 4000\n\
             [clipboard]\ncommand = [\"xclip\", \"-selection\", \"clipboard\"]\n\
             [acknowledge]\nbackend = \"stdout\"\n\
             [webdriver]\nurl = \"http://localhost:4444\"\n",
        )
        .expect("write config");

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.min_length, 11);
        assert_eq!(config.settle.render, Duration::from_millis(4000));
        assert_eq!(config.acknowledge, AcknowledgeBackend::Stdout);
        assert_eq!(
            config.clipboard.command.as_deref(),
            Some(&["xclip".to_string(), "-selection".to_string(), "clipboard".to_string()][..])
        );
        assert_eq!(
            config.webdriver.url.as_deref(),
            Some("http://localhost:4444")
        );
    }

    #[test]
    fn load_at_path_rejects_unknown_fields() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "retries = 3\n").expect("write config");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }
}
