//! # 运维支撑模块
//!
//! 提供配置加载与校验、日志初始化

pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigManager, ConfigValidator};
pub use logging::{init_logging, LogLevel, LoggingConfig};
