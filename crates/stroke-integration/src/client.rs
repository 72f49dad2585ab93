//! 预测服务HTTP客户端
//!
//! 所有请求共用一个 reqwest 客户端，默认带 `Content-Type: application/json`。
//! 失败时先记录日志再向上传递错误。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use stroke_core::utils::join_url;
use stroke_core::{PredictRequest, PredictResponse, Result, StrokeError};
use tracing::{debug, error, info, warn};

use crate::service::{AuthenticationConfig, ClientConfig, PredictionService};

/// 预测服务HTTP客户端
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpPredictionClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| StrokeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!("Prediction client configured for {}", config.base_url);
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 发送GET请求并解析JSON响应
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = join_url(&self.config.base_url, endpoint);
        debug!("GET {}", url);

        let request = self.add_auth_headers(self.client.get(&url));
        match Self::execute(request).await {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("GET request failed: {}", e);
                Err(e)
            }
        }
    }

    /// 发送POST请求并解析JSON响应
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = join_url(&self.config.base_url, endpoint);
        debug!("POST {}", url);

        let request = self.add_auth_headers(self.client.post(&url).json(body));
        match Self::execute(request).await {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("POST request failed: {}", e);
                Err(e)
            }
        }
    }

    /// 检查预测服务是否可达
    pub async fn check_connection(&self) -> Result<bool> {
        let url = join_url(&self.config.base_url, &self.config.health_endpoint);
        let request = self.add_auth_headers(self.client.get(&url));

        let response = request.send().await.map_err(map_transport_error)?;
        let healthy = response.status().is_success();
        if healthy {
            info!("Prediction service reachable at {}", url);
        } else {
            warn!("Prediction service at {} answered {}", url, response.status());
        }
        Ok(healthy)
    }

    async fn execute<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                body
            };
            return Err(StrokeError::Http {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| StrokeError::Decode(e.to_string()))
    }

    /// 添加认证头
    fn add_auth_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.authentication {
            AuthenticationConfig::None => request,
            AuthenticationConfig::BasicAuth { username, password } => {
                request.basic_auth(username, Some(password))
            }
            AuthenticationConfig::ApiKey { key, header } => {
                let header_name = header.as_deref().unwrap_or("X-API-Key");
                request.header(header_name, key)
            }
            AuthenticationConfig::BearerToken { token } => request.bearer_auth(token),
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> StrokeError {
    if e.is_timeout() {
        StrokeError::Timeout(e.to_string())
    } else {
        StrokeError::Network(e.to_string())
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    fn name(&self) -> &str {
        &self.config.base_url
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse> {
        info!("Submitting prediction request for: {}", request.name);
        self.post(&self.config.predict_endpoint, request).await
    }
}
