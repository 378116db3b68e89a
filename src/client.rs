// src/client.rs

use crate::{config::AppConfig, constants, error::*, symbols, utils};
use indicatif::HumanBytes;
use log::debug;
use reqwest::{
    IntoUrl,
    cookie::Jar,
    header::{self, HeaderMap, HeaderValue},
};
use std::{fs, path::Path, sync::Arc};

/// 模拟浏览器请求的 HTTP 客户端。
/// 每次请求都使用新的 Cookie 容器，不做任何重试。
#[derive(Clone)]
pub struct BrowserClient {
    config: Arc<AppConfig>,
}

impl BrowserClient {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    fn build_client(&self, accept: &str) -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_str(accept).map_err(|e| anyhow::anyhow!(e))?,
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_str(&self.config.accept_language).map_err(|e| anyhow::anyhow!(e))?,
        );
        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));
        headers.insert("Sec-Fetch-User", HeaderValue::from_static("?1"));
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .user_agent(self.config.user_agent.clone())
            .default_headers(headers)
            .cookie_provider(Arc::new(Jar::default()))
            .timeout(self.config.timeout)
            .build()?;
        Ok(client)
    }

    /// GET 请求，返回原始字节。非 2xx 状态、超时或重定向循环都会返回错误。
    pub async fn fetch<T: IntoUrl>(&self, url: T, accept: &str) -> AppResult<Vec<u8>> {
        let url = url.into_url()?;
        debug!("GET {} (Accept: {})", url, accept);
        let res = self.build_client(accept)?.get(url).send().await?;
        let res = res.error_for_status()?;
        Ok(res.bytes().await?.to_vec())
    }

    pub async fn fetch_html(&self, url: &str) -> AppResult<String> {
        let bytes = self.fetch(url, constants::ACCEPT_HTML).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// 下载到指定路径，父目录不存在时自动创建
    pub async fn download_file(&self, url: &str, output: &Path) -> AppResult<u64> {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        eprintln!(
            "  Downloading: {}...",
            utils::truncate_text(url, constants::URL_PREVIEW_LENGTH)
        );
        let data = self.fetch(url, constants::ACCEPT_ANY).await?;
        fs::write(output, &data)?;
        let size = data.len() as u64;
        eprintln!(
            "  {} Saved: {} ({})",
            *symbols::OK,
            output.display(),
            HumanBytes(size)
        );
        Ok(size)
    }
}
