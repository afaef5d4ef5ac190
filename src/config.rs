use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::warn;

/// Префикс переменных окружения, разделитель секций - `__`
pub const ENV_PREFIX: &str = "KEYSEQ_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub sequence: SequenceConfig,
    pub destinations: DestinationsConfig,
    pub focus: FocusConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub device_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SequenceConfig {
    #[serde(deserialize_with = "scalar_as_string")]
    pub target: Option<String>,
    pub max_pause_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DestinationsConfig {
    #[serde(deserialize_with = "scalar_as_string")]
    pub primary: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub secondary: Option<String>,
}

/// Env разбирает значения: `true` или `42` приходят скалярами, а нужны строки
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Bool(flag) => flag.to_string(),
        Scalar::Signed(number) => number.to_string(),
        Scalar::Unsigned(number) => number.to_string(),
        Scalar::Float(number) => number.to_string(),
    }))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FocusConfig {
    pub detection_mode: String,
    pub polling_interval_ms: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_path: "auto".to_string(),
        }
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            target: None,
            max_pause_ms: 1000,
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            detection_mode: "polling".to_string(),
            polling_interval_ms: 250,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.normalize();
        config.validate()?;

        Ok(config)
    }

    /// Приводит значения из файла/окружения к каноническому виду
    pub fn normalize(&mut self) {
        self.sequence.target = self
            .sequence
            .target
            .take()
            .map(|target| target.trim().to_lowercase())
            .filter(|target| !target.is_empty());
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.sequence.max_pause_ms == 0 {
            anyhow::bail!("max_pause_ms должно быть больше 0");
        }

        if let Some(target) = &self.sequence.target {
            if !target.chars().all(|c| c.is_ascii_lowercase()) {
                // Такая последовательность никогда не совпадёт, но это не ошибка
                warn!("Последовательность содержит символы вне a-z и не может быть набрана");
            }
        }

        match self.focus.detection_mode.as_str() {
            "polling" | "disabled" => {}
            _ => anyhow::bail!(
                "Неверный режим отслеживания фокуса: {}",
                self.focus.detection_mode
            ),
        }

        if self.focus.polling_interval_ms < 100 {
            anyhow::bail!("polling_interval_ms должно быть минимум 100");
        }

        Ok(())
    }

    /// Непустые адреса назначения в порядке A, B
    pub fn destinations(&self) -> Vec<String> {
        [&self.destinations.primary, &self.destinations.secondary]
            .into_iter()
            .flatten()
            .filter(|url| !url.is_empty())
            .cloned()
            .collect()
    }

    pub fn focus_tracking_enabled(&self) -> bool {
        self.focus.detection_mode != "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sequence.max_pause_ms, 1000);
        assert!(config.sequence.target.is_none());
        assert!(config.destinations().is_empty());
    }

    #[test]
    fn test_normalize_target() {
        let mut config = Config::default();
        config.sequence.target = Some("  YuSuf ".to_string());
        config.normalize();
        assert_eq!(config.sequence.target.as_deref(), Some("yusuf"));

        config.sequence.target = Some("   ".to_string());
        config.normalize();
        assert!(config.sequence.target.is_none());
    }

    #[test]
    fn test_destinations_skip_empty() {
        let mut config = Config::default();
        config.destinations.primary = Some(String::new());
        config.destinations.secondary = Some("https://b.test".to_string());
        assert_eq!(config.destinations(), vec!["https://b.test".to_string()]);

        config.destinations.primary = Some("https://a.test".to_string());
        assert_eq!(
            config.destinations(),
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.sequence.max_pause_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.focus.detection_mode = "dbus".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.focus.polling_interval_ms = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "json".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_letter_target_is_accepted() {
        let mut config = Config::default();
        config.sequence.target = Some("abc1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_env_only() {
        Jail::expect_with(|jail| {
            jail.set_env("KEYSEQ_SEQUENCE__TARGET", "Yusuf");
            jail.set_env("KEYSEQ_DESTINATIONS__PRIMARY", "https://a.test");

            let config = Config::load("missing.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.sequence.target.as_deref(), Some("yusuf"));
            assert_eq!(config.destinations(), vec!["https://a.test".to_string()]);
            assert_eq!(config.sequence.max_pause_ms, 1000);
            Ok(())
        });
    }

    #[test]
    fn test_env_scalars_stay_strings() {
        Jail::expect_with(|jail| {
            jail.set_env("KEYSEQ_SEQUENCE__TARGET", "true");
            jail.set_env("KEYSEQ_DESTINATIONS__SECONDARY", "42");

            let config = Config::load("missing.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.sequence.target.as_deref(), Some("true"));
            assert_eq!(config.destinations(), vec!["42".to_string()]);
            Ok(())
        });

        Jail::expect_with(|jail| {
            jail.set_env("KEYSEQ_SEQUENCE__TARGET", "false");

            let config = Config::load("missing.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.sequence.target.as_deref(), Some("false"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "keyseq.toml",
                r#"
                [sequence]
                target = "secret"
                max_pause_ms = 700

                [destinations]
                primary = "https://file.test"
                secondary = "https://other.test"

                [focus]
                detection_mode = "disabled"
                "#,
            )?;
            jail.set_env("KEYSEQ_DESTINATIONS__PRIMARY", "https://env.test");

            let config = Config::load("keyseq.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.sequence.target.as_deref(), Some("secret"));
            assert_eq!(config.sequence.max_pause_ms, 700);
            assert_eq!(
                config.destinations(),
                vec!["https://env.test".to_string(), "https://other.test".to_string()]
            );
            assert!(!config.focus_tracking_enabled());
            assert_eq!(config.input.device_path, "auto");
            Ok(())
        });
    }
}
