// src/scraper/freesound.rs

use super::{PageScraper, utils as scraper_utils};
use crate::models::{AudioSource, SearchResult, SourceProfile};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

// 预览 MP3 地址出现在 data-mp3 属性或播放器元素中，无需 OAuth
static PREVIEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://freesound\.org/data/previews/\d+/\d+_\d+-[a-z]+-preview[^"'\\<>\s]*\.mp3"#).unwrap()
});
static CDN_PREVIEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://cdn\.freesound\.org/previews/\d+/\d+_\d+-[a-z]+-preview[^"'\\<>\s]*\.mp3"#).unwrap()
});

pub struct FreesoundScraper {
    profile: SourceProfile,
}

impl FreesoundScraper {
    pub fn new(profile: SourceProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl PageScraper for FreesoundScraper {
    fn source(&self) -> AudioSource {
        AudioSource::Freesound
    }

    fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    fn extract_results(&self, html: &str) -> Vec<SearchResult> {
        let urls = scraper_utils::find_all(&[&*PREVIEW_RE, &*CDN_PREVIEW_RE], html);
        scraper_utils::direct_results(urls, AudioSource::Freesound)
    }
}
