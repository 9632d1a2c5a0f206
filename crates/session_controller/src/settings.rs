use std::time::Duration;

use serde::{Deserialize, Serialize};

use session_core::Config;

/// AI avatar injected by the hosting page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub url: String,
    pub fallback_url: String,
}

/// Where the confirm action of the submission popup leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionTarget {
    /// Opened in a new browsing context.
    pub url: String,
    /// Followed after `redirect_delay`, when set.
    pub redirect: Option<String>,
    pub redirect_delay: Duration,
}

/// Runtime settings of one session controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub inactivity_threshold: Duration,
    pub send_cooldown: Duration,
    pub tick_interval: Duration,
    pub submission: SubmissionTarget,
    pub avatar: Avatar,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            inactivity_threshold: config.inactivity_threshold(),
            send_cooldown: config.send_cooldown(),
            tick_interval: Duration::from_secs(1),
            submission: SubmissionTarget {
                url: config.submission_url.clone(),
                redirect: config.redirect_url.clone(),
                redirect_delay: config.redirect_delay(),
            },
            avatar: Avatar {
                url: config.avatar_url.clone(),
                fallback_url: config.fallback_avatar_url.clone(),
            },
        }
    }
}
