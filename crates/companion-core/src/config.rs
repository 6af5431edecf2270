//! Configuration — YAML config + env var overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{error, info};

use crate::i18n::Locale;
use crate::picker::{AcceptFilter, DEFAULT_ACCEPT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// "zh-CN" | "en"
    #[serde(default)]
    pub locale: Locale,

    /// Accept tokens for the attach picker (`.ext`, `type/*`, exact MIME)
    #[serde(default = "default_accept")]
    pub accept: Vec<String>,

    /// Allow selecting more than one file per attach
    #[serde(default = "default_multiple")]
    pub multiple: bool,

    /// Per-file read timeout; unset means wait as long as it takes
    #[serde(default)]
    pub read_timeout_seconds: Option<u64>,

    /// JSONL conversation log (in-memory only when unset)
    #[serde(default)]
    pub history_path: Option<String>,

    /// JSONL sink for outbound messages. No outbox means no channel.
    #[serde(default)]
    pub outbox_path: Option<String>,

    /// Resolved project root (set at load time, not serialized from YAML)
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_accept() -> Vec<String> {
    DEFAULT_ACCEPT.iter().map(|s| s.to_string()).collect()
}
fn default_multiple() -> bool {
    true
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl Config {
    /// Load config from a YAML file with env var overrides.
    pub fn load(config_path: &Path) -> Result<Self> {
        Self::load_with_env(config_path, process_env)
    }

    /// Like [`Config::load`], reading overrides through `env`.
    pub fn load_with_env<E>(config_path: &Path, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        let mut config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config.yaml")?;

        config.project_root = config_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        config.apply_env(&env)?;

        if config.accept.iter().all(|t| t.trim().is_empty()) {
            anyhow::bail!("accept must list at least one file type");
        }

        Ok(config)
    }

    /// Load project_root/config.yaml. A missing file means defaults; a broken
    /// one is logged and replaced by defaults. Env overrides apply either way.
    pub fn load_or_default(project_root: &Path) -> Self {
        Self::load_or_default_with_env(project_root, process_env)
    }

    pub fn load_or_default_with_env<E>(project_root: &Path, env: E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let path = project_root.join("config.yaml");
        if path.exists() {
            match Self::load_with_env(&path, &env) {
                Ok(config) => return config,
                Err(e) => error!("Ignoring {}: {:#}", path.display(), e),
            }
        } else {
            info!("No config at {}, using defaults", path.display());
        }

        let mut config = Config {
            project_root: project_root.to_path_buf(),
            ..Config::default()
        };
        if let Err(e) = config.apply_env(&env) {
            error!("{:#}", e);
        }
        config
    }

    /// Paths first, so a bad locale does not drop them.
    fn apply_env<E>(&mut self, env: &E) -> Result<()>
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(path) = env("COMPANION_HISTORY") {
            self.history_path = Some(path);
        }
        if let Some(path) = env("COMPANION_OUTBOX") {
            self.outbox_path = Some(path);
        }
        if let Some(locale) = env("COMPANION_LOCALE") {
            self.locale = locale
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid COMPANION_LOCALE")?;
        }
        Ok(())
    }

    pub fn accept_filter(&self) -> AcceptFilter {
        AcceptFilter::new(&self.accept, self.multiple)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_seconds.map(Duration::from_secs)
    }

    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_path.as_deref().map(|p| self.resolve(p))
    }

    pub fn outbox_path(&self) -> Option<PathBuf> {
        self.outbox_path.as_deref().map(|p| self.resolve(p))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.project_root.join(p)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            accept: default_accept(),
            multiple: default_multiple(),
            read_timeout_seconds: None,
            history_path: None,
            outbox_path: None,
            project_root: PathBuf::new(),
        }
    }
}
