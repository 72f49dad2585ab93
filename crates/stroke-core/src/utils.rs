//! 通用工具函数

/// 请求失败时展示给用户的通用提示
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while processing your data. Please try again later.";

/// 将概率渲染为展示文本
pub fn format_probability(probability: f64) -> String {
    probability.to_string()
}

/// 拼接失败信息：有状态码时带上状态码
pub fn failure_message(status_code: Option<u16>) -> String {
    match status_code {
        Some(status) => format!("Error {}: {}", status, GENERIC_FAILURE_MESSAGE),
        None => format!("Error: {}", GENERIC_FAILURE_MESSAGE),
    }
}

/// 拼接基础地址与接口路径，处理多余或缺失的斜杠
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// 检查基础地址是否为 http(s) URL
pub fn is_valid_base_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    matches!(rest, Some(host) if !host.trim_matches('/').is_empty())
}
