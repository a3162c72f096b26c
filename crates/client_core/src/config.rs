use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use shared::protocol::DEFAULT_FRAMEWORK;

pub const SETTINGS_FILE: &str = "dreamforge.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub api_prefix: String,
    /// `0` disables the timeout.
    pub request_timeout_secs: u64,
    pub framework: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".into(),
            api_prefix: "/api".into(),
            request_timeout_secs: 120,
            framework: DEFAULT_FRAMEWORK.into(),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    api_prefix: Option<String>,
    request_timeout_secs: Option<u64>,
    framework: Option<String>,
}

/// Defaults, then `dreamforge.toml` in the working directory, then environment overrides.
pub fn load_settings() -> ClientSettings {
    let mut settings = load_settings_file(Path::new(SETTINGS_FILE));
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn load_settings_file(path: &Path) -> ClientSettings {
    let mut settings = ClientSettings::default();

    let Ok(raw) = fs::read_to_string(path) else {
        return settings;
    };
    match toml::from_str::<FileSettings>(&raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.server_url {
                settings.server_url = v;
            }
            if let Some(v) = file_cfg.api_prefix {
                settings.api_prefix = v;
            }
            if let Some(v) = file_cfg.request_timeout_secs {
                settings.request_timeout_secs = v;
            }
            if let Some(v) = file_cfg.framework {
                settings.framework = v;
            }
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}");
        }
    }

    settings
}

pub fn apply_env_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DREAMFORGE_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__API_PREFIX") {
        settings.api_prefix = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = env::temp_dir().join(format!("dreamforge_settings_test_{suffix}"));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join(name);
        fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_settings_file(Path::new("/nonexistent/dreamforge.toml"));
        assert_eq!(settings, ClientSettings::default());
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn file_values_override_defaults() {
        let path = temp_file(
            "dreamforge.toml",
            "server_url = \"http://10.0.0.5:9000\"\nrequest_timeout_secs = 0\n",
        );
        let settings = load_settings_file(&path);
        assert_eq!(settings.server_url, "http://10.0.0.5:9000");
        assert_eq!(settings.api_prefix, "/api");
        assert_eq!(settings.request_timeout(), None);
        fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
    }

    #[test]
    fn malformed_file_is_ignored() {
        let path = temp_file("dreamforge.toml", "server_url = [not toml");
        assert_eq!(load_settings_file(&path), ClientSettings::default());
        fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
    }

    #[test]
    fn app_prefixed_env_wins_over_legacy_name() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DREAMFORGE_SERVER_URL", "http://legacy:1"),
            ("APP__SERVER_URL", "http://app:2"),
            ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
        ]);
        let mut settings = ClientSettings::default();
        apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.server_url, "http://app:2");
        assert_eq!(settings.request_timeout_secs, 120);
    }
}
