use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_SIPS: &str = "sips";
pub const DEFAULT_ICONUTIL: &str = "iconutil";
pub const DEFAULT_SHELL: &str = "/bin/sh";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// 視為影像的來源副檔名
pub const IMAGE_EXTENSIONS: [&str; 16] = [
    "jpg", "jpeg", "png", "heic", "heif", "tiff", "tif", "bmp",
    "gif", "pdf", "psd", "icns", "webp", "ico", "jp2", "tga",
];

#[derive(Parser, Clone, Debug)]
#[command(
    name = "iconvert",
    about = "使用系統影像工具轉換圖片格式，支援多解析度 .icns 圖示",
    long_about = "呼叫 sips 將圖片轉換為 jpeg、heic、png、tiff、bmp、gif、pdf、psd，或透過 sips 與 iconutil 產生多解析度 .icns 圖示。\n不帶任何參數執行時進入互動模式。\n使用 `--help` 查看詳細用法。",
    arg_required_else_help = true
)]
pub struct Cli {
    /// 來源圖片
    pub source: String,
    /// 輸出目錄
    #[arg(short, long)]
    pub output: String,
    /// 目標格式
    #[arg(short, long, value_parser = ["jpeg", "heic", "png", "tiff", "icns", "bmp", "gif", "pdf", "psd"])]
    pub format: String,
    #[arg(long)]
    pub sips: Option<String>,
    #[arg(long)]
    pub iconutil: Option<String>,
    #[arg(long)]
    pub shell: Option<String>,
    /// 單一外部指令的逾時秒數
    #[arg(long)]
    pub timeout: Option<u64>,
    /// 只依輸出文字判斷成敗，忽略結束代碼
    #[arg(long, default_value_t = false)]
    pub ignore_exit_status: bool,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: Option<String>,
    #[arg(long, default_value_t = false)]
    pub show_config: bool,
}

pub fn is_image_like(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

pub fn validate_source_path(source: &str) -> io::Result<PathBuf> {
    let path = Path::new(source);
    if !path.exists() {
        log::error!("來源檔案不存在：{}", source);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("來源檔案 '{}' 不存在", source)
        ));
    }
    if !path.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("來源 '{}' 不是檔案", source)));
    }
    if !is_image_like(path) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("來源 '{}' 不是支援的圖片類型（{}）", source, IMAGE_EXTENSIONS.join(", "))
        ));
    }
    std::path::absolute(path)
}

pub fn validate_destination_dir(output: &str) -> io::Result<PathBuf> {
    let path = Path::new(output);
    if !path.is_dir() {
        log::error!("輸出目錄不存在：{}", output);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸出目錄 '{}' 不存在或不是目錄", output)
        ));
    }
    std::path::absolute(path)
}
