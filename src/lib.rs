// src/lib.rs

pub mod batch;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod resolver;
pub mod scraper;
pub mod symbols;
pub mod transcoder;
pub mod ui;
pub mod utils;

use crate::{
    batch::BatchRunner,
    cli::{Cli, Command},
    client::BrowserClient,
    config::{AppConfig, credentials::resolve_api_key},
    error::AppResult,
    models::{OutcomeStatus, SavedAsset},
    resolver::{AudioResolver, ImageResolver},
    transcoder::Transcoder,
};
use log::{debug, info};
use std::sync::Arc;

/// 所有解析器共享的执行上下文
#[derive(Clone)]
pub struct FetchContext {
    pub config: Arc<AppConfig>,
    pub client: Arc<BrowserClient>,
    pub transcoder: Arc<Transcoder>,
}

impl FetchContext {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            client: Arc::new(BrowserClient::new(config.clone())),
            transcoder: Arc::new(Transcoder::new(&config)),
            config,
        }
    }
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    let config = Arc::new(AppConfig::new()?);
    debug!("加载的应用配置: {:?}", config);
    let context = FetchContext::new(config.clone());

    match &args.command {
        Command::Image {
            prompt,
            output,
            size,
            quality,
        } => {
            // 缺少 API Key 在开始前即为致命错误
            let (api_key, source) = resolve_api_key(&config.api_key_file)?;
            info!("从 {} 加载 API Key", source);
            let saved = ImageResolver::new(&context, api_key)?
                .generate_image(prompt, output, *size, *quality)
                .await?;
            report_saved(&saved);
        }
        Command::Audio {
            url,
            output,
            format,
        } => {
            let saved = AudioResolver::new(&context)
                .download_audio(url, output, format.as_deref())
                .await?;
            report_saved(&saved);
        }
        Command::SearchAudio {
            query,
            output,
            format,
            source,
            pick,
        } => {
            let saved = AudioResolver::new(&context)
                .search_and_download_audio(query, output, format.as_deref(), *source, *pick)
                .await?;
            report_saved(&saved);
        }
        Command::ListAudio { query, source } => {
            AudioResolver::new(&context).list_audio(query, *source).await;
        }
        Command::Batch { manifest } => {
            BatchRunner::new(context).run(manifest).await?;
        }
    }

    Ok(())
}

fn report_saved(saved: &SavedAsset) {
    let status = OutcomeStatus::from(saved.outcome);
    let (symbol, color) = status.get_display_info();
    let message = match status {
        OutcomeStatus::Ok => format!("Done: {}", saved.path.display()),
        OutcomeStatus::RawCopy => format!(
            "Saved without conversion (ffmpeg missing): {}",
            saved.path.display()
        ),
    };
    eprintln!("\n{} {}", symbol, color(message.into()));
}
