//! 配置管理
//!
//! 配置来源按优先级从低到高：内置默认值、配置文件、`STROKE__*` 环境变量、`API_URL`、
//! 调用方传入的服务地址。
//!
//! 加载过程不写日志，调用方通常在配置加载之后才初始化日志。

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use stroke_core::utils::is_valid_base_url;
use stroke_integration::ClientConfig;
use tracing::info;

use crate::logging::LoggingConfig;

/// 预测服务地址的环境变量
pub const API_URL_ENV: &str = "API_URL";

/// 客户端完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 预测服务配置
    pub api: ClientConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<String>,
    api_url_override: Option<String>,
    validator: ConfigValidator,
}

impl ConfigManager {
    /// 从可选的配置文件和进程环境加载配置
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        Self::with_env(config_path, None)
    }

    /// 使用给定的环境变量表代替进程环境加载配置
    pub fn with_env(
        config_path: Option<&str>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        Self::with_overrides(config_path, env, None)
    }

    /// 加载配置，`api_url` 覆盖其他所有来源的服务地址，并在覆盖之后才校验
    pub fn with_overrides(
        config_path: Option<&str>,
        env: Option<config::Map<String, String>>,
        api_url: Option<&str>,
    ) -> Result<Self> {
        let validator = ConfigValidator::new();
        let config = Self::load_config(config_path, env, api_url)?;
        validator.validate(&config)?;

        Ok(Self {
            config,
            config_path: config_path.map(str::to_string),
            api_url_override: api_url.map(str::to_string),
            validator,
        })
    }

    fn load_config(
        config_path: Option<&str>,
        env: Option<config::Map<String, String>>,
        api_url_override: Option<&str>,
    ) -> Result<AppConfig> {
        let api_url = match &env {
            Some(vars) => vars.get(API_URL_ENV).cloned(),
            None => std::env::var(API_URL_ENV).ok(),
        };

        let mut builder = Config::builder().add_source(
            Config::try_from(&AppConfig::default()).context("Failed to build default configuration")?,
        );

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("STROKE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            builder = builder.set_override("api.base_url", url)?;
        }
        if let Some(url) = api_url_override {
            builder = builder.set_override("api.base_url", url)?;
        }

        let settings = builder.build().context("Failed to load configuration")?;
        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&str> {
        self.config_path.as_deref()
    }

    /// 重新加载配置
    pub fn reload_config(&mut self) -> Result<()> {
        let config = Self::load_config(
            self.config_path.as_deref(),
            None,
            self.api_url_override.as_deref(),
        )?;
        self.validator.validate(&config)?;
        self.config = config;
        info!("Configuration reloaded");
        Ok(())
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }
}

/// 单条校验规则
struct ValidationRule {
    field_path: &'static str,
    validator: fn(&AppConfig) -> Result<()>,
}

/// 配置校验器
pub struct ConfigValidator {
    validation_rules: Vec<ValidationRule>,
}

impl std::fmt::Debug for ConfigValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.validation_rules.iter().map(|rule| rule.field_path))
            .finish()
    }
}

impl ConfigValidator {
    pub fn new() -> Self {
        let validation_rules = vec![
            ValidationRule {
                field_path: "api.base_url",
                validator: |config| {
                    if is_valid_base_url(&config.api.base_url) {
                        Ok(())
                    } else {
                        Err(anyhow::anyhow!(
                            "Base URL must be an http(s) address, got '{}'",
                            config.api.base_url
                        ))
                    }
                },
            },
            ValidationRule {
                field_path: "api.predict_endpoint",
                validator: |config| {
                    if config.api.predict_endpoint.trim().is_empty() {
                        Err(anyhow::anyhow!("Predict endpoint cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
            },
            ValidationRule {
                field_path: "api.timeout_secs",
                validator: |config| match config.api.timeout_secs {
                    Some(0) => Err(anyhow::anyhow!("Timeout cannot be 0")),
                    _ => Ok(()),
                },
            },
        ];

        Self { validation_rules }
    }

    /// 校验配置，遇到第一条失败的规则即返回
    pub fn validate(&self, config: &AppConfig) -> Result<()> {
        for rule in &self.validation_rules {
            if let Err(e) = (rule.validator)(config) {
                return Err(anyhow::anyhow!("Invalid {}: {}", rule.field_path, e));
            }
        }
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use stroke_integration::AuthenticationConfig;

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let manager = ConfigManager::with_env(None, env(&[])).unwrap();
        let config = manager.get_config();

        assert_eq!(config, &AppConfig::default());
        assert_eq!(config.api.predict_endpoint, "/predict");
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.api.authentication, AuthenticationConfig::None);
    }

    #[test]
    fn test_api_url_override() {
        let manager = ConfigManager::with_env(
            None,
            env(&[
                ("API_URL", "https://predict.example.com"),
                ("STROKE__API__BASE_URL", "http://ignored:9000"),
                ("STROKE__API__TIMEOUT_SECS", "15"),
                ("STROKE__LOGGING__LEVEL", "debug"),
            ]),
        )
        .unwrap();
        let config = manager.get_config();

        assert_eq!(config.api.base_url, "https://predict.example.com");
        assert_eq!(config.api.timeout_secs, Some(15));
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_config_file() {
        let path = std::env::temp_dir().join(format!("stroke-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
[api]
base_url = "http://model.internal:5000"
predict_endpoint = "/v2/predict"

[api.authentication]
type = "bearer_token"
token = "abc"

[logging]
level = "info"
ansi = false
"#,
        )
        .unwrap();

        let manager = ConfigManager::with_env(path.to_str(), env(&[])).unwrap();
        let config = manager.get_config().clone();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.api.base_url, "http://model.internal:5000");
        assert_eq!(config.api.predict_endpoint, "/v2/predict");
        assert_eq!(config.api.health_endpoint, "/");
        assert_eq!(
            config.api.authentication,
            AuthenticationConfig::BearerToken {
                token: "abc".to_string()
            }
        );
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(!config.logging.ansi);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = ConfigManager::with_env(None, env(&[("API_URL", "localhost:8000")])).unwrap_err();
        assert!(err.to_string().contains("api.base_url"));

        let err = ConfigManager::with_env(None, env(&[("STROKE__API__TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("api.timeout_secs"));
    }

    #[test]
    fn test_explicit_api_url_wins_over_bad_env() {
        let manager = ConfigManager::with_overrides(
            None,
            env(&[("API_URL", "localhost:8000")]),
            Some("http://127.0.0.1:9000"),
        )
        .unwrap();
        assert_eq!(manager.get_config().api.base_url, "http://127.0.0.1:9000");

        let err = ConfigManager::with_overrides(
            None,
            env(&[("API_URL", "https://predict.example.com")]),
            Some("ftp://model"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("api.base_url"));
    }
}
