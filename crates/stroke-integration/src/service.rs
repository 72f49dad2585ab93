//! 预测服务接口与客户端配置

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stroke_core::{PredictRequest, PredictResponse, Result};

/// 预测服务接口
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// 服务名称，用于日志
    fn name(&self) -> &str;

    /// 发送一次预测请求
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse>;
}

/// 认证配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthenticationConfig {
    #[default]
    None,
    BasicAuth { username: String, password: String },
    ApiKey { key: String, header: Option<String> },
    BearerToken { token: String },
}

/// 预测服务客户端配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 服务基础地址（API_URL）
    pub base_url: String,
    /// 预测接口路径
    pub predict_endpoint: String,
    /// 连接检查路径
    pub health_endpoint: String,
    /// 请求超时（秒），未设置时一直等待
    pub timeout_secs: Option<u64>,
    pub authentication: AuthenticationConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            predict_endpoint: "/predict".to_string(),
            health_endpoint: "/".to_string(),
            timeout_secs: None,
            authentication: AuthenticationConfig::None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
