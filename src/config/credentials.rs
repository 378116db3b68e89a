// src/config/credentials.rs

use crate::{
    config::ExternalConfig,
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

fn get_config_dir() -> AppResult<PathBuf> {
    let dir = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("could not determine the home directory")))?
        .join(constants::CONFIG_DIR_NAME);
    Ok(dir)
}

pub(crate) fn get_config_path() -> AppResult<PathBuf> {
    Ok(get_config_dir()?.join(constants::CONFIG_FILE_NAME))
}

pub(crate) fn default_api_key_path() -> AppResult<PathBuf> {
    Ok(get_config_dir()?.join(constants::API_KEY_FILE_NAME))
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file '{}'", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file '{}'", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

/// 按顺序查找 API Key: 固定路径的密钥文件，然后是环境变量。
/// 返回 key 以及来源描述。
pub fn resolve_api_key(key_file: &Path) -> AppResult<(String, String)> {
    if key_file.is_file() {
        let key = fs::read_to_string(key_file)
            .with_context(|| format!("failed to read API key file '{}'", key_file.display()))?;
        let key = key.trim();
        if !key.is_empty() {
            debug!("使用来自密钥文件 {:?} 的 API Key", key_file);
            return Ok((key.to_string(), key_file.display().to_string()));
        }
    }
    if let Ok(key) = std::env::var(constants::API_KEY_ENV) && !key.is_empty() {
        debug!("使用来自环境变量 {} 的 API Key", constants::API_KEY_ENV);
        return Ok((key, format!("${}", constants::API_KEY_ENV)));
    }
    debug!("未在任何位置找到可用的 API Key");
    Err(AppError::MissingCredential {
        key_file: key_file.display().to_string(),
        env_var: constants::API_KEY_ENV.to_string(),
    })
}
