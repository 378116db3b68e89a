// src/config.rs

pub mod credentials;

use self::credentials::{default_api_key_path, load_or_create_external_config};
use crate::{
    constants::{self, sources},
    error::AppResult,
    models::{AudioSource, SourceProfile},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub timeout_secs: Option<u64>,
    pub api_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImageApiConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolsConfig {
    pub ffmpeg: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub image_api: ImageApiConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_file: Option<PathBuf>,
    /// 缺失的来源使用内置默认值
    #[serde(default)]
    pub sources: BTreeMap<AudioSource, SourceProfile>,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        let network_config = NetworkConfig {
            timeout_secs: Some(constants::DEFAULT_TIMEOUT_SECS),
            api_timeout_secs: Some(constants::DEFAULT_API_TIMEOUT_SECS),
            user_agent: Some(constants::USER_AGENT.into()),
            accept_language: Some(constants::ACCEPT_LANGUAGE.into()),
        };

        Self {
            network: network_config,
            image_api: ImageApiConfig {
                base_url: Some(constants::image_api::DEFAULT_BASE_URL.into()),
                model: Some(constants::image_api::DEFAULT_MODEL.into()),
            },
            tools: ToolsConfig {
                ffmpeg: Some(constants::DEFAULT_FFMPEG_PROGRAM.into()),
            },
            api_key_file: None,
            sources: default_sources(),
        }
    }
}

/// 内置的两个授权安全的音频来源
pub fn default_sources() -> BTreeMap<AudioSource, SourceProfile> {
    BTreeMap::from([
        (
            AudioSource::Pixabay,
            SourceProfile {
                name: sources::PIXABAY_NAME.into(),
                license: sources::PIXABAY_LICENSE.into(),
                license_label: sources::PIXABAY_LABEL.into(),
                tag: sources::PIXABAY_TAG.into(),
                search_url: sources::PIXABAY_SEARCH_URL.into(),
                page_url: Some(sources::PIXABAY_PAGE_URL.into()),
            },
        ),
        (
            AudioSource::Freesound,
            SourceProfile {
                name: sources::FREESOUND_NAME.into(),
                license: sources::FREESOUND_LICENSE.into(),
                license_label: sources::FREESOUND_LABEL.into(),
                tag: sources::FREESOUND_TAG.into(),
                search_url: sources::FREESOUND_SEARCH_URL.into(),
                page_url: None,
            },
        ),
    ])
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub timeout: Duration,
    pub api_timeout: Duration,
    pub image_api_base: String,
    pub image_model: String,
    pub ffmpeg_program: String,
    pub api_key_file: PathBuf,
    pub sources: BTreeMap<AudioSource, SourceProfile>,
}

impl AppConfig {
    pub fn new() -> AppResult<Self> {
        let mut external_config = load_or_create_external_config()?;
        let api_key_file = match external_config.api_key_file.take() {
            Some(path) => path,
            None => default_api_key_path()?,
        };
        Ok(Self::from_external(external_config, api_key_file))
    }

    pub fn from_external(external_config: ExternalConfig, api_key_file: PathBuf) -> Self {
        let mut sources = default_sources();
        sources.extend(external_config.sources);

        let network = external_config.network;
        Self {
            user_agent: network.user_agent.unwrap_or_else(|| constants::USER_AGENT.into()),
            accept_language: network
                .accept_language
                .unwrap_or_else(|| constants::ACCEPT_LANGUAGE.into()),
            timeout: Duration::from_secs(
                network.timeout_secs.unwrap_or(constants::DEFAULT_TIMEOUT_SECS),
            ),
            api_timeout: Duration::from_secs(
                network
                    .api_timeout_secs
                    .unwrap_or(constants::DEFAULT_API_TIMEOUT_SECS),
            ),
            image_api_base: external_config
                .image_api
                .base_url
                .unwrap_or_else(|| constants::image_api::DEFAULT_BASE_URL.into()),
            image_model: external_config
                .image_api
                .model
                .unwrap_or_else(|| constants::image_api::DEFAULT_MODEL.into()),
            ffmpeg_program: external_config
                .tools
                .ffmpeg
                .unwrap_or_else(|| constants::DEFAULT_FFMPEG_PROGRAM.into()),
            api_key_file,
            sources,
        }
    }

    pub fn source_profile(&self, source: AudioSource) -> Option<&SourceProfile> {
        self.sources.get(&source)
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: "test-agent/1.0".to_string(),
            accept_language: constants::ACCEPT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(5),
            api_timeout: Duration::from_secs(5),
            image_api_base: "http://127.0.0.1:9/v1".to_string(),
            image_model: constants::image_api::DEFAULT_MODEL.to_string(),
            ffmpeg_program: constants::DEFAULT_FFMPEG_PROGRAM.to_string(),
            api_key_file: PathBuf::from("/nonexistent/openai_api_key"),
            sources: default_sources(),
        }
    }
}
