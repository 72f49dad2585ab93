//! # 预测服务集成模块
//!
//! 负责与外部预测服务通信：
//! - `PredictionService` 抽象，便于替换实现或在测试中使用桩服务
//! - 基于 reqwest 的 HTTP 客户端，发送 `POST {API_URL}/predict`
//! - 认证头与连接检查

pub mod client;
pub mod service;

pub use client::HttpPredictionClient;
pub use service::{AuthenticationConfig, ClientConfig, PredictionService};
