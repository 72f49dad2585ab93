//! 日志初始化

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// 日志级别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(anyhow::anyhow!("Unknown log level: {}", other)),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
    /// 是否输出颜色
    pub ansi: bool,
    /// 是否输出模块路径
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            ansi: true,
            with_target: false,
        }
    }
}

/// 计算过滤规则：命令行覆盖优先，其次 RUST_LOG，最后是配置级别
pub fn resolve_filter(config: &LoggingConfig, override_level: Option<LogLevel>, rust_log: Option<&str>) -> String {
    match (override_level, rust_log) {
        (Some(level), _) => level.as_str().to_string(),
        (None, Some(directives)) if !directives.trim().is_empty() => directives.to_string(),
        _ => config.level.as_str().to_string(),
    }
}

/// 初始化全局日志订阅器
pub fn init_logging(config: &LoggingConfig, override_level: Option<LogLevel>) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = resolve_filter(config, override_level, rust_log.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&filter)?)
        .with_ansi(config.ansi)
        .with_target(config.with_target)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("Logging initialized with filter: {}", filter);
    Ok(())
}
