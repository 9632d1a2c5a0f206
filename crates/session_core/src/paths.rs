use std::path::PathBuf;

/// Root directory for tutor session data (~/.tutor-session)
pub fn tutor_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".tutor-session")
}

/// config.json path
pub fn config_json_path() -> PathBuf {
    tutor_dir().join("config.json")
}

/// Default directory for persisted session start times
pub fn clock_dir() -> PathBuf {
    tutor_dir().join("clock")
}
