// src/resolver/audio.rs

use super::{ensure_parent_dir, move_into_place};
use crate::{
    FetchContext,
    cli::SourceSelector,
    client::BrowserClient,
    constants,
    error::*,
    models::{AudioSource, SavedAsset, SearchResult, SourceProfile},
    scraper::{PageScraper, create_scraper, page::extract_direct_audio_url},
    symbols,
    transcoder::{MediaFormat, TranscodeOutcome, Transcoder},
    ui, utils,
};
use colored::Colorize;
use log::{debug, info, warn};
use std::{
    collections::BTreeMap,
    path::Path,
    sync::Arc,
};

/// 超出范围的序号回退到第一个结果
pub fn clamp_pick(pick: usize, len: usize) -> usize {
    if pick >= len { 0 } else { pick }
}

/// 显式指定的格式优先，否则取输出文件的扩展名
pub fn resolve_target_format(format: Option<&str>, output: &Path) -> MediaFormat {
    match format {
        Some(hint) if !hint.trim().is_empty() => MediaFormat::from_hint(hint),
        _ => MediaFormat::from_path(output),
    }
}

pub struct AudioResolver {
    client: Arc<BrowserClient>,
    transcoder: Arc<Transcoder>,
    scrapers: BTreeMap<AudioSource, Box<dyn PageScraper>>,
}

impl AudioResolver {
    pub fn new(context: &FetchContext) -> Self {
        Self::with_sources(context, &context.config.sources)
    }

    pub fn with_sources(
        context: &FetchContext,
        sources: &BTreeMap<AudioSource, SourceProfile>,
    ) -> Self {
        let scrapers = sources
            .iter()
            .map(|(source, profile)| (*source, create_scraper(*source, profile.clone())))
            .collect();
        Self {
            client: context.client.clone(),
            transcoder: context.transcoder.clone(),
            scrapers,
        }
    }

    pub fn profile(&self, source: AudioSource) -> Option<&SourceProfile> {
        self.scrapers.get(&source).map(|s| s.profile())
    }

    /// 结果中显示的来源标记，如 `freesound-cc0`
    pub fn source_tag(&self, source: AudioSource) -> &str {
        self.profile(source)
            .map(|p| p.tag.as_str())
            .unwrap_or(source.id())
    }

    /// 按来源顺序拼接各站点的结果
    pub async fn search_audio(&self, query: &str, selector: SourceSelector) -> Vec<SearchResult> {
        let mut results = Vec::new();
        for source in selector.sources() {
            match self.scrapers.get(source) {
                Some(scraper) => results.extend(scraper.search(query, &self.client).await),
                None => warn!("来源 '{}' 未配置，跳过", source),
            }
        }
        results
    }

    /// 只列出结果，不下载
    pub async fn list_audio(&self, query: &str, selector: SourceSelector) -> Vec<SearchResult> {
        let results = self.search_audio(query, selector).await;
        if results.is_empty() {
            println!("  No results found for '{}' on {}", query, selector.id());
            return results;
        }

        println!("\n  Found {} result(s) for '{}':", results.len(), query);
        for (i, result) in results.iter().take(constants::LIST_PREVIEW_COUNT).enumerate() {
            let label = self
                .profile(result.source)
                .map(|p| p.license_label.as_str())
                .unwrap_or("unknown");
            println!("    [{}] [{}] {}", i, label, result.title);
            println!("        {}", result.url);
        }
        results
    }

    /// 请求详情页并查找直链; 请求失败同样返回 None
    pub async fn resolve_page_to_direct_url(&self, page_url: &str) -> Option<String> {
        match self.client.fetch_html(page_url).await {
            Ok(html) => extract_direct_audio_url(&html),
            Err(e) => {
                debug!("详情页 '{}' 请求失败: {}", page_url, e);
                None
            }
        }
    }

    pub async fn download_audio(
        &self,
        url: &str,
        output: &Path,
        format: Option<&str>,
    ) -> AppResult<SavedAsset> {
        let target = resolve_target_format(format, output);
        let source_ext = utils::url_extension(url)
            .unwrap_or_else(|| constants::DEFAULT_SOURCE_EXTENSION.to_string());
        info!("下载音频 {} -> {:?} (源格式: {}, 目标格式: {})", url, output, source_ext, target);

        // 临时文件在离开作用域时删除，无论成功与否
        let tmp = tempfile::Builder::new()
            .prefix("asset-fetcher-")
            .suffix(&format!(".{}", source_ext))
            .tempfile()?;
        self.client.download_file(url, tmp.path()).await?;
        ensure_parent_dir(output)?;

        let outcome = if source_ext == target.extension() {
            move_into_place(tmp, output)?;
            eprintln!("  {} No conversion needed - saved as {}", *symbols::OK, output.display());
            TranscodeOutcome::Unchanged
        } else {
            self.transcoder.convert(tmp.path(), output, &target).await?
        };

        Ok(SavedAsset {
            path: output.to_path_buf(),
            outcome,
        })
    }

    pub async fn search_and_download_audio(
        &self,
        query: &str,
        output: &Path,
        format: Option<&str>,
        selector: SourceSelector,
        pick: usize,
    ) -> AppResult<SavedAsset> {
        let results = self.search_audio(query, selector).await;
        if results.is_empty() {
            return Err(AppError::NoResults {
                query: query.to_string(),
                site: selector.id().to_string(),
            });
        }

        let index = clamp_pick(pick, results.len());
        if index != pick {
            warn!("序号 {} 超出结果数量 {}，改用第一个结果", pick, results.len());
        }

        eprintln!("  Found {} result(s):", results.len());
        for (i, result) in results.iter().take(constants::SEARCH_PREVIEW_COUNT).enumerate() {
            let marker = if i == index { " <<<".green().to_string() } else { String::new() };
            let page_tag = if result.is_page { " [page link]" } else { "" };
            eprintln!(
                "    [{}] {} ({}){}{}",
                i,
                result.title,
                self.source_tag(result.source),
                page_tag,
                marker
            );
        }

        let chosen = &results[index];
        let url = if chosen.is_page {
            eprintln!("  Got page URL, attempting to extract audio from: {}", chosen.url);
            match self.resolve_page_to_direct_url(&chosen.url).await {
                Some(direct_url) => {
                    eprintln!(
                        "  Found direct audio URL: {}",
                        utils::truncate_text(&direct_url, 80)
                    );
                    direct_url
                }
                None => {
                    ui::error("Could not extract audio URL from page.");
                    return Err(AppError::PageUnresolved {
                        page_url: chosen.url.clone(),
                        output: output.display().to_string(),
                    });
                }
            }
        } else {
            chosen.url.clone()
        };

        eprintln!(
            "  Downloading: [{}] {} ({})",
            index,
            chosen.title,
            self.source_tag(chosen.source)
        );
        self.download_audio(&url, output, format).await
    }
}
