// src/scraper/utils.rs

use crate::{
    models::{AudioSource, SearchResult},
    utils::url_file_stem,
};
use heck::ToTitleCase;
use itertools::Itertools;
use regex::Regex;

/// 依次应用每个正则，按 "先模式、后位置" 的顺序收集所有匹配
pub fn find_all(patterns: &[&Regex], html: &str) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|re| re.find_iter(html))
        .map(|m| trim_url(m.as_str()).to_string())
        .collect()
}

/// 去掉匹配末尾误带的标点
pub fn trim_url(url: &str) -> &str {
    url.trim_end_matches(['.', ',', ';'])
}

/// 去重并保留首次出现的顺序，标题取自文件名
pub fn direct_results(urls: Vec<String>, source: AudioSource) -> Vec<SearchResult> {
    urls.into_iter()
        .unique()
        .map(|url| SearchResult {
            title: url_file_stem(&url),
            url,
            source,
            is_page: false,
            slug: None,
        })
        .collect()
}

/// `ocean-waves-12345` -> `Ocean Waves`
pub fn title_from_slug(slug: &str) -> String {
    let stem = match slug.rsplit_once('-') {
        Some((head, id)) if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) => head,
        _ => slug,
    };
    stem.replace('-', " ").to_title_case()
}
