// tests/audio_resolver_test.rs

use asset_fetcher::{
    FetchContext,
    cli::SourceSelector,
    config::{AppConfig, default_sources},
    error::AppError,
    models::AudioSource,
    resolver::AudioResolver,
    transcoder::TranscodeOutcome,
};
use mockito::Matcher;
use std::{fs, sync::Arc};
use tempfile::tempdir;

// 把两个来源的搜索地址都指向本地 mock 服务器
fn mock_context(base: &str) -> FetchContext {
    let mut config = AppConfig::default();
    let mut sources = default_sources();
    if let Some(p) = sources.get_mut(&AudioSource::Pixabay) {
        p.search_url = format!("{}/sound-effects/search/{{query}}/", base);
        p.page_url = Some(format!("{}/sound-effects/{{slug}}/", base));
    }
    if let Some(f) = sources.get_mut(&AudioSource::Freesound) {
        f.search_url = format!("{}/freesound/search/?q={{query}}", base);
    }
    config.sources = sources;
    FetchContext::new(Arc::new(config))
}

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{}", name)).expect("无法读取 HTML 夹具")
}

#[tokio::test]
async fn test_download_same_format_keeps_bytes() {
    let mut server = mockito::Server::new_async().await;
    let payload = b"RIFF\x24\x00\x00\x00WAVEfmt fake-wave-data".to_vec();
    let mock = server
        .mock("GET", "/audio/2024/01/01/tap.wav")
        .with_status(200)
        .with_header("content-type", "audio/wav")
        .with_body(payload.clone())
        .expect(2)
        .create_async()
        .await;

    let ctx = mock_context(&server.url());
    let resolver = AudioResolver::new(&ctx);
    let dir = tempdir().unwrap();
    let output = dir.path().join("sfx/tap.wav");
    let url = format!("{}/audio/2024/01/01/tap.wav", server.url());

    let saved = resolver.download_audio(&url, &output, None).await.unwrap();
    assert_eq!(saved.outcome, TranscodeOutcome::Unchanged);
    assert_eq!(saved.path, output);
    assert_eq!(fs::read(&output).unwrap(), payload);

    // 再次下载覆盖原文件，内容不变
    let again = resolver.download_audio(&url, &output, Some("wav")).await.unwrap();
    assert_eq!(again.outcome, TranscodeOutcome::Unchanged);
    assert_eq!(fs::read(&output).unwrap(), payload);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_download_http_error_leaves_no_output() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/missing.mp3")
        .with_status(404)
        .create_async()
        .await;

    let ctx = mock_context(&server.url());
    let dir = tempdir().unwrap();
    let output = dir.path().join("missing.mp3");
    let url = format!("{}/missing.mp3", server.url());

    let err = AudioResolver::new(&ctx)
        .download_audio(&url, &output, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Network(_)));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_search_all_keeps_source_order() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/sound-effects/search/ocean+waves/")
        .with_status(200)
        .with_body(fixture("pixabay_pages.html"))
        .create_async()
        .await;
    server
        .mock("GET", "/freesound/search/")
        .match_query(Matcher::UrlEncoded("q".into(), "ocean waves".into()))
        .with_status(200)
        .with_body(fixture("freesound_search.html"))
        .create_async()
        .await;

    let ctx = mock_context(&server.url());
    let results = AudioResolver::new(&ctx)
        .search_audio("ocean waves", SourceSelector::All)
        .await;

    let sources: Vec<_> = results.iter().map(|r| r.source).collect();
    assert_eq!(
        sources,
        [
            AudioSource::Pixabay,
            AudioSource::Pixabay,
            AudioSource::Pixabay,
            AudioSource::Freesound,
            AudioSource::Freesound,
            AudioSource::Freesound,
        ]
    );
    assert_eq!(
        results[0].url,
        format!("{}/sound-effects/ocean-waves-12345/", server.url())
    );
}

#[tokio::test]
async fn test_failed_source_is_skipped() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Regex(r"^/sound-effects/search/".into()))
        .with_status(503)
        .create_async()
        .await;
    server
        .mock("GET", "/freesound/search/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(fixture("freesound_search.html"))
        .create_async()
        .await;

    let ctx = mock_context(&server.url());
    let results = AudioResolver::new(&ctx)
        .search_audio("door creak", SourceSelector::All)
        .await;
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.source == AudioSource::Freesound));
}

#[tokio::test]
async fn test_page_result_resolves_to_direct_url() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/sound-effects/ocean-waves-112906/")
        .with_status(200)
        .with_body(fixture("pixabay_sound_page.html"))
        .create_async()
        .await;

    let ctx = mock_context(&server.url());
    let page_url = format!("{}/sound-effects/ocean-waves-112906/", server.url());
    let direct = AudioResolver::new(&ctx)
        .resolve_page_to_direct_url(&page_url)
        .await;
    assert_eq!(
        direct.as_deref(),
        Some("https://cdn.pixabay.com/audio/2022/10/30/ocean-waves-112906.mp3")
    );

    // 请求失败与找不到直链一样返回 None
    let missing = format!("{}/sound-effects/nothing-here-1/", server.url());
    assert!(
        AudioResolver::new(&ctx)
            .resolve_page_to_direct_url(&missing)
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_search_without_results_fails_with_tip() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Regex(r"^/sound-effects/search/".into()))
        .with_status(200)
        .with_body("<html><body>No results</body></html>")
        .create_async()
        .await;

    let ctx = mock_context(&server.url());
    let dir = tempdir().unwrap();
    let output = dir.path().join("nothing.m4a");

    let err = AudioResolver::new(&ctx)
        .search_and_download_audio("xyzzy", &output, None, SourceSelector::Pixabay, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoResults { .. }));
    let message = err.to_string();
    assert!(message.contains("'xyzzy'"));
    assert!(message.contains("--url"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_unresolvable_page_reports_manual_command() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/sound-effects/search/waves/")
        .with_status(200)
        .with_body(fixture("pixabay_pages.html"))
        .create_async()
        .await;
    // 详情页存在，但页面中没有任何音频地址
    let page = server
        .mock("GET", "/sound-effects/seagulls-at-the-pier-998877/")
        .with_status(200)
        .with_body("<html><body><h1>Seagulls</h1></body></html>")
        .create_async()
        .await;

    let ctx = mock_context(&server.url());
    let dir = tempdir().unwrap();
    let output = dir.path().join("gulls.m4a");

    // 序号 1 选中第二个详情页
    let err = AudioResolver::new(&ctx)
        .search_and_download_audio("waves", &output, None, SourceSelector::Pixabay, 1)
        .await
        .unwrap_err();
    page.assert_async().await;

    match &err {
        AppError::PageUnresolved { page_url, .. } => {
            assert!(page_url.ends_with("/sound-effects/seagulls-at-the-pier-998877/"))
        }
        other => panic!("意外的错误类型: {:?}", other),
    }
    assert!(err.to_string().contains("--output"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_out_of_range_pick_uses_first_result() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/sound-effects/search/waves/")
        .with_status(200)
        .with_body(fixture("pixabay_pages.html"))
        .create_async()
        .await;
    let first = server
        .mock("GET", "/sound-effects/ocean-waves-12345/")
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;

    let ctx = mock_context(&server.url());
    let dir = tempdir().unwrap();
    let err = AudioResolver::new(&ctx)
        .search_and_download_audio("waves", &dir.path().join("w.m4a"), None, SourceSelector::Pixabay, 42)
        .await
        .unwrap_err();

    first.assert_async().await;
    assert!(matches!(err, AppError::PageUnresolved { .. }));
}

#[test]
fn test_source_tag_comes_from_profile() {
    let ctx = FetchContext::new(Arc::new(AppConfig::default()));
    let resolver = AudioResolver::new(&ctx);
    assert_eq!(resolver.source_tag(AudioSource::Freesound), "freesound-cc0");
    assert_eq!(resolver.source_tag(AudioSource::Pixabay), "pixabay");

    // 未配置的来源退回到来源 id
    let only_pixabay = default_sources()
        .into_iter()
        .filter(|(source, _)| *source == AudioSource::Pixabay)
        .collect();
    let resolver = AudioResolver::with_sources(&ctx, &only_pixabay);
    assert_eq!(resolver.source_tag(AudioSource::Freesound), "freesound");
}
