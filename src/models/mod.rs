// src/models/mod.rs

pub mod api;
pub mod manifest;

use crate::{
    cli::{ImageQuality, ImageSize, SourceSelector},
    symbols,
    transcoder::TranscodeOutcome,
};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

/// 具体的音频来源站点，作为来源配置表的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSource {
    Pixabay,
    Freesound,
}

impl AudioSource {
    pub fn id(&self) -> &'static str {
        match self {
            AudioSource::Pixabay => "pixabay",
            AudioSource::Freesound => "freesound",
        }
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl SourceSelector {
    /// 展开为按顺序搜索的站点列表
    pub fn sources(&self) -> &'static [AudioSource] {
        match self {
            SourceSelector::Pixabay => &[AudioSource::Pixabay],
            SourceSelector::Freesound => &[AudioSource::Freesound],
            SourceSelector::All => &[AudioSource::Pixabay, AudioSource::Freesound],
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            SourceSelector::Pixabay => "pixabay",
            SourceSelector::Freesound => "freesound",
            SourceSelector::All => "all",
        }
    }
}

/// 单个来源站点的元数据: 显示名、许可证、搜索地址模板
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceProfile {
    pub name: String,
    pub license: String,
    pub license_label: String,
    /// 结果中的来源标记，如 "freesound-cc0"
    pub tag: String,
    /// 含 `{query}` 占位符
    pub search_url: String,
    /// 含 `{slug}` 占位符，仅适用于返回中间页面的站点
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub source: AudioSource,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: ImageSize,
    pub quality: ImageQuality,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioLocator {
    Direct(String),
    Search(String),
}

#[derive(Debug, Clone)]
pub struct AudioRequest {
    pub locator: AudioLocator,
    pub source: SourceSelector,
    pub format: String,
    pub pick: usize,
}

/// 成功条目的状态; `raw-copy` 表示 ffmpeg 不可用，文件未经转码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeStatus {
    Ok,
    RawCopy,
}

impl From<TranscodeOutcome> for OutcomeStatus {
    fn from(outcome: TranscodeOutcome) -> Self {
        match outcome {
            TranscodeOutcome::Copied => OutcomeStatus::RawCopy,
            TranscodeOutcome::Converted | TranscodeOutcome::Unchanged => OutcomeStatus::Ok,
        }
    }
}

impl OutcomeStatus {
    pub fn get_display_info(&self) -> (&'static ColoredString, fn(ColoredString) -> ColoredString) {
        match self {
            OutcomeStatus::Ok => (&*symbols::OK, |s| s.green()),
            OutcomeStatus::RawCopy => (&*symbols::WARN, |s| s.yellow()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssetOutcome {
    pub name: String,
    pub path: PathBuf,
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssetError {
    pub name: String,
    #[serde(rename = "error")]
    pub message: String,
}

/// 批量任务的最终产物，每个清单条目恰好对应其中一项
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub images: Vec<AssetOutcome>,
    pub audio: Vec<AssetOutcome>,
    pub errors: Vec<AssetError>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.images.len() + self.audio.len() + self.errors.len()
    }
}

/// 已保存的文件及其转码情况
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAsset {
    pub path: PathBuf,
    pub outcome: TranscodeOutcome,
}
