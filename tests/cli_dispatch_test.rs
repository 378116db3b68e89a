// tests/cli_dispatch_test.rs

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// 辅助函数，避免重复
fn main_command(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("HOME", home).env("NO_COLOR", "1");
    cmd
}

/// 在临时主目录下写入配置，把搜索与图片接口指向本地服务器
fn write_config(home: &Path, base: &str) {
    let dir = home.join(".asset-fetcher");
    fs::create_dir_all(&dir).unwrap();
    let config = json!({
        "network": { "timeout_secs": 5, "api_timeout_secs": 5 },
        "image_api": { "base_url": format!("{}/v1", base) },
        "tools": { "ffmpeg": "asset-fetcher-no-such-ffmpeg" },
        "sources": {
            "pixabay": {
                "name": "Pixabay",
                "license": "Pixabay License",
                "license_label": "Pixabay",
                "tag": "pixabay-free",
                "search_url": format!("{}/sound-effects/search/{{query}}/", base),
                "page_url": format!("{}/sound-effects/{{slug}}/", base)
            }
        }
    });
    fs::write(dir.join("config.json"), config.to_string()).unwrap();
}

// --- 测试基本 CLI 行为 ---

#[test]
fn test_help_flag() {
    let home = tempdir().unwrap();
    main_command(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search-audio"))
        .stdout(predicate::str::contains("CC0 Public Domain"));
}

#[test]
fn test_missing_subcommand_shows_usage() {
    let home = tempdir().unwrap();
    main_command(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: asset-fetcher"));
}

#[test]
fn test_unprofiled_audio_format_is_passed_through() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/cdn/loop.mp3")
        .with_status(200)
        .with_body("mp3-bytes")
        .create();

    let home = tempdir().unwrap();
    write_config(home.path(), &server.url());
    let out = home.path().join("loop.oga");

    // 没有 ffmpeg 时按原样复制，仍然会尝试以 ogg 为目标格式转换
    main_command(home.path())
        .args(["audio", "--url", format!("{}/cdn/loop.mp3", server.url()).as_str()])
        .args(["--format", "ogg", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Converting -> ogg"))
        .stderr(predicate::str::contains("Saved without conversion"));
    assert_eq!(fs::read(&out).unwrap(), b"mp3-bytes");
}

// --- 测试核心分发逻辑 ---

#[test]
fn test_image_uses_configured_key_file() {
    let mut server = mockito::Server::new();
    let api = server
        .mock("POST", "/v1/images/generations")
        .match_header("authorization", "Bearer sk-from-config")
        .with_status(400)
        .with_body(r#"{"error": {"message": "content policy violation"}}"#)
        .create();

    let home = tempdir().unwrap();
    let key_file = home.path().join("keys/openai.txt");
    fs::create_dir_all(key_file.parent().unwrap()).unwrap();
    fs::write(&key_file, "sk-from-config\n").unwrap();

    let dir = home.path().join(".asset-fetcher");
    fs::create_dir_all(&dir).unwrap();
    let config = json!({
        "image_api": { "base_url": format!("{}/v1", server.url()) },
        "api_key_file": key_file
    });
    fs::write(dir.join("config.json"), config.to_string()).unwrap();

    main_command(home.path())
        .env_remove("OPENAI_API_KEY")
        .args(["image", "--prompt", "a calm lake", "--output"])
        .arg(home.path().join("lake.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("image API returned 400: content policy violation"));
    api.assert();
}

#[test]
fn test_batch_with_images_requires_api_key_up_front() {
    let mut server = mockito::Server::new();
    let audio = server.mock("GET", "/cdn/chime.wav").expect(0).create();

    let home = tempdir().unwrap();
    write_config(home.path(), &server.url());
    let manifest_path = home.path().join("assets.json");
    let manifest = json!({
        "output_dir": home.path().join("Resources"),
        "images": [{ "name": "hero.png", "prompt": "sky" }],
        "audio": [{ "name": "chime.wav", "url": format!("{}/cdn/chime.wav", server.url()) }]
    });
    fs::write(&manifest_path, manifest.to_string()).unwrap();

    main_command(home.path())
        .env_remove("OPENAI_API_KEY")
        .args(["batch", "--manifest"])
        .arg(&manifest_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));

    audio.assert();
    assert!(!home.path().join("assets.results.json").exists());
}

#[test]
fn test_search_results_show_source_tag() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/sound-effects/search/ocean/")
        .with_status(200)
        .with_body(fs::read_to_string("tests/fixtures/pixabay_pages.html").unwrap())
        .create();
    server
        .mock("GET", "/sound-effects/ocean-waves-12345/")
        .with_status(200)
        .with_body("<html><body>no audio here</body></html>")
        .create();

    let home = tempdir().unwrap();
    write_config(home.path(), &server.url());

    main_command(home.path())
        .args(["search-audio", "--query", "ocean", "--output"])
        .arg(home.path().join("ocean.m4a"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("[0] Ocean Waves (pixabay-free) [page link]"))
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_image_without_api_key_fails_before_any_request() {
    let home = tempdir().unwrap();
    let out = home.path().join("hero.png");
    main_command(home.path())
        .env_remove("OPENAI_API_KEY")
        .args(["image", "--prompt", "a calm lake", "--output"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
    assert!(!out.exists());
    // 首次运行会生成默认配置文件
    assert!(home.path().join(".asset-fetcher/config.json").exists());
}

#[test]
fn test_search_audio_without_results_exits_with_tip() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/sound-effects/search/xyzzy+plugh/")
        .with_status(200)
        .with_body("<html><body>Nothing matched</body></html>")
        .create();

    let home = tempdir().unwrap();
    write_config(home.path(), &server.url());
    let out = home.path().join("none.m4a");

    main_command(home.path())
        .args(["search-audio", "--query", "xyzzy plugh", "--output"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no results found for 'xyzzy plugh'"))
        .stderr(predicate::str::contains("provide a direct --url"));
    assert!(!out.exists());
}

#[test]
fn test_list_audio_prints_results() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/sound-effects/search/ocean/")
        .with_status(200)
        .with_body(fs::read_to_string("tests/fixtures/pixabay_pages.html").unwrap())
        .create();

    let home = tempdir().unwrap();
    write_config(home.path(), &server.url());

    main_command(home.path())
        .args(["list-audio", "--query", "ocean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 result(s) for 'ocean'"))
        .stdout(predicate::str::contains("[0] [Pixabay] Ocean Waves"));
}

#[test]
fn test_batch_writes_results_next_to_manifest() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/cdn/chime.wav")
        .with_status(200)
        .with_body("chime-bytes")
        .create();

    let home = tempdir().unwrap();
    write_config(home.path(), &server.url());

    let out_dir = home.path().join("Resources");
    let manifest_path = home.path().join("assets.json");
    let manifest = json!({
        "output_dir": out_dir,
        "audio": [
            { "name": "chime.wav", "url": format!("{}/cdn/chime.wav", server.url()) },
            { "name": "broken.caf" }
        ]
    });
    fs::write(&manifest_path, manifest.to_string()).unwrap();

    // 单个条目失败不影响退出码
    main_command(home.path())
        .args(["batch", "--manifest"])
        .arg(&manifest_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("BATCH SUMMARY"))
        .stderr(predicate::str::contains("broken.caf: no url or search"));

    assert_eq!(fs::read(out_dir.join("chime.wav")).unwrap(), b"chime-bytes");
    let results: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(home.path().join("assets.results.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(results["audio"][0]["name"], "chime.wav");
    assert_eq!(results["errors"][0]["error"], "no url or search");
}
