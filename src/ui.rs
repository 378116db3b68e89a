// src/ui.rs

use crate::constants;
use colored::*;

// 进度信息统一写到 stderr，stdout 只留给命令的结果输出

pub fn print_header(title: &str) {
    eprintln!("\n{}", "═".repeat(constants::UI_WIDTH));
    eprintln!(" {}", title.cyan().bold());
    eprintln!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    eprintln!("\n--- {} ---", title.bold());
}

pub fn warn(message: &str) {
    eprintln!("  {} {}", *crate::symbols::WARN, message.yellow());
}

pub fn error(message: &str) {
    eprintln!("  {} {}", *crate::symbols::ERROR, message.red());
}
