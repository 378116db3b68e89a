// src/models/manifest.rs

use crate::error::{AppError, AppResult};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::path::PathBuf;

/// 批量清单文件的原始结构。条目保持为未解析的 JSON，
/// 在处理时逐条解析，单个条目的类型错误不会让整个清单解析失败。
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub images: Vec<Value>,
    #[serde(default)]
    pub audio: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageEntry {
    pub name: String,
    pub prompt: Option<String>,
    pub size: Option<String>,
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioEntry {
    pub name: String,
    pub url: Option<String>,
    pub search: Option<String>,
    pub source: Option<String>,
    pub format: Option<String>,
    pub pick: Option<usize>,
}

/// 条目的显示名; 缺少 `name` 时用 `images[0]` 这样的位置代替
pub fn entry_name(entry: &Value, list: &str, index: usize) -> String {
    entry
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}[{}]", list, index))
}

pub fn parse_entry<T: DeserializeOwned>(entry: &Value) -> AppResult<T> {
    T::deserialize(entry)
        .map_err(|e| AppError::InvalidManifestEntry(format!("invalid entry: {}", e)))
}
