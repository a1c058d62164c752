use std::time::Duration;

/// Backend the client talks to when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub polling: PollSettings,
    pub log_level: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Document status polling: one request per interval, bounded by `max_attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct PollSettings {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            max_attempts: 30,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                timeout_secs: 30,
            },
            polling: PollSettings::default(),
            log_level: "off".to_string(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let defaults = Settings::default();

    let settings = config::Config::builder()
        .set_default("api.base_url", defaults.api.base_url)?
        .set_default("api.timeout_secs", defaults.api.timeout_secs as i64)?
        .set_default("polling.interval_ms", defaults.polling.interval_ms as i64)?
        .set_default("polling.max_attempts", defaults.polling.max_attempts as i64)?
        .set_default("log_level", defaults.log_level)?
        // configuration.yaml / .toml / .json in the working directory, if present
        .add_source(config::File::with_name("configuration").required(false))
        // LEGALMEM_API__BASE_URL=http://... overrides api.base_url
        .add_source(
            config::Environment::with_prefix("LEGALMEM")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "http://localhost:8000/api/v1");
        assert_eq!(settings.polling.interval(), Duration::from_secs(10));
        assert_eq!(settings.polling.max_attempts, 30);
        assert_eq!(settings.api.timeout(), Duration::from_secs(30));
        assert_eq!(settings.log_level, "off");
    }

    #[test]
    fn test_get_configuration_without_file_uses_defaults() {
        let settings = get_configuration().unwrap();
        assert_eq!(settings.polling, PollSettings::default());
        assert!(!settings.api.base_url.is_empty());
    }
}
