// src/batch.rs

use crate::{
    FetchContext,
    cli::{ImageQuality, ImageSize, SourceSelector},
    config::credentials::resolve_api_key,
    constants,
    error::*,
    models::{
        AssetError, AssetOutcome, AudioLocator, AudioRequest, BatchResult, ImageRequest,
        OutcomeStatus, SavedAsset,
        manifest::{AudioEntry, ImageEntry, Manifest, entry_name, parse_entry},
    },
    resolver::{AudioResolver, ImageResolver},
    symbols, ui,
};
use anyhow::Context;
use clap::ValueEnum;
use colored::*;
use log::{error, info};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// `assets.json` -> `assets.results.json`
pub fn results_path_for(manifest_path: &Path) -> PathBuf {
    manifest_path.with_extension(constants::RESULTS_EXTENSION)
}

fn parse_choice<T: ValueEnum>(field: &str, value: Option<&str>) -> AppResult<Option<T>> {
    value
        .map(|v| {
            T::from_str(v, true).map_err(|_| {
                AppError::InvalidManifestEntry(format!("invalid {} '{}'", field, v))
            })
        })
        .transpose()
}

pub fn image_request_from(entry: &ImageEntry) -> AppResult<ImageRequest> {
    let prompt = entry
        .prompt
        .clone()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::InvalidManifestEntry("missing prompt".to_string()))?;
    Ok(ImageRequest {
        prompt,
        size: parse_choice::<ImageSize>("size", entry.size.as_deref())?.unwrap_or_default(),
        quality: parse_choice::<ImageQuality>("quality", entry.quality.as_deref())?
            .unwrap_or_default(),
    })
}

/// `url` 优先于 `search`; 两者都没有时直接判为错误，不发起任何请求
pub fn audio_request_from(entry: &AudioEntry) -> AppResult<AudioRequest> {
    let locator = match (&entry.url, &entry.search) {
        (Some(url), _) => AudioLocator::Direct(url.clone()),
        (None, Some(query)) => AudioLocator::Search(query.clone()),
        (None, None) => {
            return Err(AppError::InvalidManifestEntry("no url or search".to_string()));
        }
    };
    let format = entry.format.clone().unwrap_or_else(|| {
        Path::new(&entry.name)
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    Ok(AudioRequest {
        locator,
        source: parse_choice::<SourceSelector>("source", entry.source.as_deref())?
            .unwrap_or_default(),
        format,
        pick: entry.pick.unwrap_or(0),
    })
}

/// 顺序处理清单中的每个条目，单个条目的失败只记录，不中断整个批次
pub struct BatchRunner {
    context: FetchContext,
    audio: AudioResolver,
    images: Option<ImageResolver>,
}

impl BatchRunner {
    pub fn new(context: FetchContext) -> Self {
        Self {
            audio: AudioResolver::new(&context),
            context,
            images: None,
        }
    }

    /// API Key 只读取一次，之后复用同一个解析器
    fn image_resolver(&mut self) -> AppResult<&ImageResolver> {
        if self.images.is_none() {
            let (api_key, source) = resolve_api_key(&self.context.config.api_key_file)?;
            info!("从 {} 加载 API Key", source);
            self.images = Some(ImageResolver::new(&self.context, api_key)?);
        }
        self.images
            .as_ref()
            .ok_or_else(|| AppError::Other(anyhow::anyhow!("image resolver unavailable")))
    }

    async fn process_image(&mut self, entry: &Value, output_dir: &Path) -> AppResult<SavedAsset> {
        let entry: ImageEntry = parse_entry(entry)?;
        let request = image_request_from(&entry)?;
        let output = output_dir.join(&entry.name);
        self.image_resolver()?
            .generate_image(&request.prompt, &output, request.size, request.quality)
            .await
    }

    async fn process_audio(&self, entry: &Value, output_dir: &Path) -> AppResult<SavedAsset> {
        let entry: AudioEntry = parse_entry(entry)?;
        let request = audio_request_from(&entry)?;
        let output = output_dir.join(&entry.name);
        let licenses = request
            .source
            .sources()
            .iter()
            .filter_map(|s| self.audio.profile(*s))
            .map(|p| p.license.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        eprintln!("  {} License: {}", *symbols::INFO, licenses);

        let format = Some(request.format.as_str());
        match &request.locator {
            AudioLocator::Direct(url) => self.audio.download_audio(url, &output, format).await,
            AudioLocator::Search(query) => {
                self.audio
                    .search_and_download_audio(query, &output, format, request.source, request.pick)
                    .await
            }
        }
    }

    pub async fn run(&mut self, manifest_path: &Path) -> AppResult<BatchResult> {
        let content = fs::read_to_string(manifest_path)
            .with_context(|| format!("failed to read manifest '{}'", manifest_path.display()))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse manifest '{}'", manifest_path.display()))?;

        let output_dir = manifest
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_OUTPUT_DIR));

        // 缺少 API Key 对图片条目是致命错误，在处理任何条目之前检查
        if !manifest.images.is_empty() {
            self.image_resolver()?;
        }
        fs::create_dir_all(&output_dir)?;
        info!(
            "开始处理清单 {:?}: {} 张图片, {} 个音频",
            manifest_path,
            manifest.images.len(),
            manifest.audio.len()
        );

        let mut results = BatchResult::default();

        if !manifest.images.is_empty() {
            ui::print_sub_header(&format!("Images ({})", manifest.images.len()));
        }
        for (i, entry) in manifest.images.iter().enumerate() {
            let name = entry_name(entry, "images", i);
            ui::print_header(&format!("IMAGE: {}", name));
            match self.process_image(entry, &output_dir).await {
                Ok(saved) => results.images.push(AssetOutcome {
                    name,
                    path: saved.path,
                    status: saved.outcome.into(),
                }),
                Err(e) => record_error(&mut results, &name, e),
            }
        }

        if !manifest.audio.is_empty() {
            ui::print_sub_header(&format!("Audio ({})", manifest.audio.len()));
        }
        for (i, entry) in manifest.audio.iter().enumerate() {
            let name = entry_name(entry, "audio", i);
            let source = entry
                .get("source")
                .and_then(Value::as_str)
                .unwrap_or(SourceSelector::default().id());
            ui::print_header(&format!("AUDIO: {} (source: {})", name, source));
            match self.process_audio(entry, &output_dir).await {
                Ok(saved) => results.audio.push(AssetOutcome {
                    name,
                    path: saved.path,
                    status: saved.outcome.into(),
                }),
                Err(e) => record_error(&mut results, &name, e),
            }
        }

        print_summary(&output_dir, &results);

        let results_path = results_path_for(manifest_path);
        fs::write(&results_path, serde_json::to_string_pretty(&results)?)?;
        eprintln!("\n  Results written to: {}", results_path.display());
        Ok(results)
    }
}

fn record_error(results: &mut BatchResult, name: &str, e: AppError) {
    error!("清单条目 '{}' 失败: {}", name, e);
    ui::error(&e.to_string());
    results.errors.push(AssetError {
        name: name.to_string(),
        message: e.to_string(),
    });
}

fn print_summary(output_dir: &Path, results: &BatchResult) {
    ui::print_header("BATCH SUMMARY");
    eprintln!("  Output dir: {}", output_dir.display());
    eprintln!("  Images: {} fetched", results.images.len());
    eprintln!("  Audio:  {} fetched", results.audio.len());
    eprintln!("  Entries processed: {}", results.total());

    let raw_copies: Vec<_> = results
        .images
        .iter()
        .chain(&results.audio)
        .filter(|o| o.status == OutcomeStatus::RawCopy)
        .collect();
    for outcome in &raw_copies {
        let (symbol, color) = outcome.status.get_display_info();
        eprintln!(
            "    {} {}",
            symbol,
            color(format!("{}: saved without conversion (ffmpeg missing)", outcome.name).into())
        );
    }

    if results.errors.is_empty() {
        eprintln!("  {} All assets fetched successfully.", *symbols::OK);
    } else {
        eprintln!("  {}", format!("Errors: {}", results.errors.len()).red());
        for e in &results.errors {
            eprintln!("    {} {}: {}", *symbols::ERROR, e.name, e.message);
        }
    }
}
