//! # Stroke Core
//!
//! 卒中预测客户端的核心模块，提供患者数据模型、外部接口映射、错误定义和通用工具。

pub mod error;
pub mod models;
pub mod utils;

pub use error::{Result, StrokeError};
pub use models::*;
