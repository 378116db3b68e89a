// src/scraper/pixabay.rs

use super::{PageScraper, utils as scraper_utils};
use crate::models::{AudioSource, SearchResult, SourceProfile};
use async_trait::async_trait;
use itertools::Itertools;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

// Pixabay 的音频大多由 JS 加载，页面里偶尔能直接找到 CDN 地址 (JSON-LD 或 preload)
static CDN_AUDIO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://cdn\.pixabay\.com/audio/\d{4}/[^"'\\<>\s})]+\.(?:mp3|wav|ogg|m4a)"#).unwrap()
});
static CDN_DOWNLOAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://cdn\.pixabay\.com/download/audio[^"'\\<>\s})]+\.(?:mp3|wav|ogg|m4a)"#).unwrap()
});
/// 音效详情页: /sound-effects/rain-patter-12345/
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/sound-effects/([\w-]+-\d+)/").unwrap());

pub struct PixabayScraper {
    profile: SourceProfile,
}

impl PixabayScraper {
    pub fn new(profile: SourceProfile) -> Self {
        Self { profile }
    }

    fn page_url(&self, slug: &str) -> String {
        match &self.profile.page_url {
            Some(template) => template.replace("{slug}", slug),
            None => format!("https://pixabay.com/sound-effects/{}/", slug),
        }
    }

    /// 找不到直链时，退而返回详情页链接，留给后续解析
    fn extract_pages(&self, html: &str) -> Vec<SearchResult> {
        SLUG_RE
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .filter(|slug| !slug.starts_with("search"))
            .unique()
            .map(|slug| SearchResult {
                url: self.page_url(slug),
                title: scraper_utils::title_from_slug(slug),
                source: AudioSource::Pixabay,
                is_page: true,
                slug: Some(slug.to_string()),
            })
            .collect()
    }
}

#[async_trait]
impl PageScraper for PixabayScraper {
    fn source(&self) -> AudioSource {
        AudioSource::Pixabay
    }

    fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    fn extract_results(&self, html: &str) -> Vec<SearchResult> {
        let direct_urls = scraper_utils::find_all(&[&*CDN_AUDIO_RE, &*CDN_DOWNLOAD_RE], html);
        if !direct_urls.is_empty() {
            debug!("Pixabay 页面中找到 {} 个直链匹配", direct_urls.len());
            return scraper_utils::direct_results(direct_urls, AudioSource::Pixabay);
        }
        self.extract_pages(html)
    }
}
