// src/main.rs

use asset_fetcher::{cli::Cli, logging, run_from_cli};
use clap::Parser;
use colored::*;
use std::sync::Arc;

// 所有请求与子进程调用都按顺序执行，单线程运行时即可
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let args = Arc::new(Cli::parse());
    logging::setup_logging(args.log_level);

    if let Err(e) = run_from_cli(args).await {
        log::error!("程序执行出错: {}", e);
        eprintln!("\n{} {}", "[X]".red(), format!("Error: {}", e).red());
        std::process::exit(1);
    }
}
