// src/scraper/mod.rs

pub mod freesound;
pub mod page;
pub mod pixabay;
pub mod utils;

use crate::{
    client::BrowserClient,
    models::{AudioSource, SearchResult, SourceProfile},
    ui,
    utils::encode_query,
};
use async_trait::async_trait;
use log::{info, warn};

/// 单个站点的搜索结果抓取。
/// HTML 解析部分 (`extract_results`) 是纯函数，可以直接用保存的页面测试。
#[async_trait]
pub trait PageScraper: Send + Sync {
    fn source(&self) -> AudioSource;

    fn profile(&self) -> &SourceProfile;

    /// 从搜索结果页中提取候选音频，保持页面中的出现顺序
    fn extract_results(&self, html: &str) -> Vec<SearchResult>;

    fn search_url(&self, query: &str) -> String {
        self.profile()
            .search_url
            .replace("{query}", &encode_query(query))
    }

    /// 请求失败不视为错误，只记录警告并返回空列表
    async fn search(&self, query: &str, client: &BrowserClient) -> Vec<SearchResult> {
        let url = self.search_url(query);
        eprintln!("  Searching {}: {}", self.profile().name, url);
        match client.fetch_html(&url).await {
            Ok(html) => {
                let results = self.extract_results(&html);
                info!(
                    "{} 搜索 '{}' 得到 {} 个结果",
                    self.source(),
                    query,
                    results.len()
                );
                results
            }
            Err(e) => {
                warn!("{} 搜索 '{}' 失败: {}", self.source(), query, e);
                ui::warn(&format!("{} search failed: {}", self.profile().name, e));
                vec![]
            }
        }
    }
}

pub fn create_scraper(source: AudioSource, profile: SourceProfile) -> Box<dyn PageScraper> {
    match source {
        AudioSource::Pixabay => Box::new(pixabay::PixabayScraper::new(profile)),
        AudioSource::Freesound => Box::new(freesound::FreesoundScraper::new(profile)),
    }
}
