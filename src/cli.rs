// src/cli.rs

use crate::constants;
use clap::{Parser, Subcommand, ValueEnum, crate_version};
use serde::Serialize;
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// 图片尺寸，取值与生成接口一致
#[derive(ValueEnum, Serialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[value(name = "1024x1024")]
    #[serde(rename = "1024x1024")]
    Square,
    #[value(name = "1024x1792")]
    #[serde(rename = "1024x1792")]
    Portrait,
    #[default]
    #[value(name = "1792x1024")]
    #[serde(rename = "1792x1024")]
    Landscape,
}

#[derive(ValueEnum, Serialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    #[default]
    Standard,
    Hd,
}

/// 搜索来源; `all` 按 pixabay、freesound 的顺序合并结果
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SourceSelector {
    #[default]
    Pixabay,
    Freesound,
    All,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about = "Asset fetcher - DALL-E 3 images + Pixabay/Freesound audio",
    long_about = None,
    after_help = constants::HELP_AFTER,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a DALL-E 3 image
    Image {
        /// Image generation prompt
        #[arg(long)]
        prompt: String,
        /// Output file path (.png, or any extension ffmpeg can write)
        #[arg(long)]
        output: PathBuf,
        /// Image dimensions
        #[arg(long, value_enum, default_value_t = ImageSize::default())]
        size: ImageSize,
        /// DALL-E quality tier
        #[arg(long, value_enum, default_value_t = ImageQuality::default())]
        quality: ImageQuality,
    },
    /// Download + convert audio from a direct URL
    Audio {
        /// Direct audio file URL
        #[arg(long)]
        url: String,
        /// Output file path
        #[arg(long)]
        output: PathBuf,
        /// Target format: m4a, caf, wav, or any extension ffmpeg can write (inferred from the output extension)
        #[arg(long)]
        format: Option<String>,
    },
    /// Search Pixabay/Freesound and download audio
    SearchAudio {
        /// Search query (e.g. 'rain patter loop')
        #[arg(long)]
        query: String,
        /// Output file path
        #[arg(long)]
        output: PathBuf,
        /// Target format: m4a, caf, wav, or any extension ffmpeg can write (inferred from the output extension)
        #[arg(long)]
        format: Option<String>,
        /// Where to search
        #[arg(long, value_enum, default_value_t = SourceSelector::default())]
        source: SourceSelector,
        /// Which result to download (0 = first)
        #[arg(long, default_value_t = 0)]
        pick: usize,
    },
    /// List search results without downloading
    ListAudio {
        /// Search query
        #[arg(long)]
        query: String,
        /// Where to search
        #[arg(long, value_enum, default_value_t = SourceSelector::default())]
        source: SourceSelector,
    },
    /// Process a JSON asset manifest
    Batch {
        /// Path to the manifest JSON file
        #[arg(long, value_name = "PATH")]
        manifest: PathBuf,
    },
}
