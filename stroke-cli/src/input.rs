//! 表单输入收集：命令行 `key=value` 与 JSON 文件

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// 解析 `key=value` 形式的字段
pub fn parse_field_arg(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Field must be given as key=value, got '{}'", arg))?;

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Field name cannot be empty in '{}'", arg);
    }
    Ok((key.to_string(), value.to_string()))
}

/// 把 JSON 对象转换为表单原始输入
pub fn fields_from_json(value: &Value) -> Result<HashMap<String, String>> {
    let object = value
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("Input must be a JSON object"))?;

    let mut fields = HashMap::new();
    for (key, value) in object {
        let raw = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            Value::Null => continue,
            other => anyhow::bail!("Unsupported value for field '{}': {}", key, other),
        };
        fields.insert(key.clone(), raw);
    }
    Ok(fields)
}

/// 合并 JSON 文件与命令行字段，命令行优先
pub fn collect_fields(input: Option<&Path>, field_args: &[String]) -> Result<HashMap<String, String>> {
    let mut fields = match input {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))?;
            let value: Value = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse input file {}", path.display()))?;
            fields_from_json(&value)?
        }
        None => HashMap::new(),
    };

    for arg in field_args {
        let (key, value) = parse_field_arg(arg)?;
        fields.insert(key, value);
    }
    Ok(fields)
}
