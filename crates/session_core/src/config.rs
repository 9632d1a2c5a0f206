use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};
use crate::paths;

const CONFIG_FILE_PATH: &str = "config.toml";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_BUDGET_SECONDS: u64 = 30 * 60;
/// Upper bound accepted for a configured budget (one week)
pub const MAX_BUDGET_SECONDS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_INACTIVITY_THRESHOLD_MS: u64 = 5 * 60 * 1000;
pub const DEFAULT_SEND_COOLDOWN_MS: u64 = 2000;
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 1000;
pub const DEFAULT_SUBMISSION_URL: &str =
    "https://drive.google.com/drive/folders/1dWldlJJg4gMgS8KwmLYd0ShcihWeB5fO?usp=drive_link";
pub const DEFAULT_AVATAR_URL: &str = "/static/images/peer_avatar.webp";
pub const DEFAULT_FALLBACK_AVATAR_URL: &str = "/static/images/placeholder_avatar.png";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub participant_id: String,
    pub backend_url: String,
    pub budget_seconds: u64,
    pub inactivity_threshold_ms: u64,
    pub send_cooldown_ms: u64,
    pub submission_url: String,
    pub redirect_url: Option<String>,
    pub redirect_delay_ms: u64,
    pub avatar_url: String,
    pub fallback_avatar_url: String,
    pub storage_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            participant_id: String::new(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            budget_seconds: DEFAULT_BUDGET_SECONDS,
            inactivity_threshold_ms: DEFAULT_INACTIVITY_THRESHOLD_MS,
            send_cooldown_ms: DEFAULT_SEND_COOLDOWN_MS,
            submission_url: DEFAULT_SUBMISSION_URL.to_string(),
            redirect_url: None,
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            fallback_avatar_url: DEFAULT_FALLBACK_AVATAR_URL.to_string(),
            storage_dir: None,
        }
    }
}

impl Config {
    /// Load from ~/.tutor-session/config.json, else ./config.toml, then apply
    /// environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_json_file(&paths::config_json_path())
            .or_else(|| Self::from_toml_file(Path::new(CONFIG_FILE_PATH)))
            .unwrap_or_default();
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    fn from_json_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<Config>(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring unreadable config {}: {}", path.display(), e);
                None
            }
        }
    }

    fn from_toml_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str::<Config>(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring unreadable config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Apply `TUTOR_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("TUTOR_PARTICIPANT_ID") {
            self.participant_id = id;
        }
        if let Some(url) = lookup("TUTOR_BACKEND_URL") {
            self.backend_url = url;
        }
        if let Some(url) = lookup("TUTOR_SUBMISSION_URL") {
            self.submission_url = url;
        }
        if let Some(url) = lookup("TUTOR_REDIRECT_URL") {
            self.redirect_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(url) = lookup("TUTOR_AVATAR_URL") {
            self.avatar_url = url;
        }
        if let Some(url) = lookup("TUTOR_FALLBACK_AVATAR_URL") {
            self.fallback_avatar_url = url;
        }
        if let Some(dir) = lookup("TUTOR_STORAGE_DIR") {
            self.storage_dir = Some(PathBuf::from(dir));
        }
        apply_u64(&lookup, "TUTOR_BUDGET_SECONDS", &mut self.budget_seconds);
        apply_u64(&lookup, "TUTOR_INACTIVITY_MS", &mut self.inactivity_threshold_ms);
        apply_u64(&lookup, "TUTOR_SEND_COOLDOWN_MS", &mut self.send_cooldown_ms);
    }

    pub fn validate(&self) -> Result<()> {
        if self.participant_id.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "participant id is required".to_string(),
            ));
        }
        if self.budget_seconds > MAX_BUDGET_SECONDS {
            return Err(SessionError::InvalidConfig(format!(
                "budget of {}s exceeds the {}s maximum",
                self.budget_seconds, MAX_BUDGET_SECONDS
            )));
        }
        if self.inactivity_threshold_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "inactivity threshold must be greater than zero".to_string(),
            ));
        }
        url::Url::parse(&self.backend_url).map_err(|e| {
            SessionError::InvalidConfig(format!("backend url {:?}: {e}", self.backend_url))
        })?;
        Ok(())
    }

    pub fn inactivity_threshold(&self) -> Duration {
        Duration::from_millis(self.inactivity_threshold_ms)
    }

    pub fn send_cooldown(&self) -> Duration {
        Duration::from_millis(self.send_cooldown_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(paths::clock_dir)
    }
}

fn apply_u64<F>(lookup: &F, name: &str, target: &mut u64)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(name) {
        match raw.trim().parse::<u64>() {
            Ok(value) => *target = value,
            Err(_) => warn!("Ignoring {}={:?}: not a non-negative integer", name, raw),
        }
    }
}
