use dialoguer::{Confirm, Input, Select};
use std::io;
use std::time::Duration;

use crate::action::cli::run_conversion;
use crate::config::config::{DEFAULT_ICONUTIL, DEFAULT_SHELL, DEFAULT_SIPS, validate_destination_dir, validate_source_path};
use crate::config::ports::{AppConfig, ConfigPort};
use crate::models::conversion::{ConversionOutput, ImageFormat};
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::utils::utils::setup_logging;

const LOG_LEVELS: [&str; 4] = ["info", "warn", "error", "debug"];

pub fn process_interactive_mode() -> io::Result<ConversionOutput> {
    println!("=== 歡迎使用互動模式 ===");
    let source = get_source_path()?;
    let output = get_output_dir()?;
    let format = get_target_format()?;
    let use_default_config = get_default_config_option()?;

    let config_port: Box<dyn ConfigPort> = if use_default_config {
        println!("使用預設配置：sips、iconutil、/bin/sh，檢查結束代碼，不設逾時");
        Box::new(DefaultConfigAdapter::new(source, output, format))
    } else {
        Box::new(InteractiveConfigAdapter::new(source, output, format))
    };

    let config = ConfigService::new(config_port).get_config()?;
    setup_logging(&config.log_level)?;
    run_conversion(&config)
}

pub fn get_source_path() -> io::Result<String> {
    Input::new()
        .with_prompt("請輸入來源圖片路徑（例如：./photo.heic）")
        .validate_with(|input: &String| -> Result<(), String> {
            validate_source_path(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

pub fn get_output_dir() -> io::Result<String> {
    Input::new()
        .with_prompt("輸入輸出目錄（預設為目前目錄）")
        .default(".".to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            validate_destination_dir(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

pub fn get_target_format() -> io::Result<String> {
    let tags = ImageFormat::tags();
    let index = Select::new()
        .with_prompt("選擇目標格式（icns 會產生多解析度圖示，使用方向鍵選擇，按 Enter 確認）")
        .items(&tags)
        .default(0)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("目標格式選擇失敗: {}", e)))?;
    Ok(tags[index].to_string())
}

pub fn get_default_config_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否使用預設配置？（系統 sips 與 iconutil，檢查結束代碼，不設逾時）")
        .default(true)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("預設配置選擇失敗: {}", e)))
}

pub fn get_timeout_option() -> io::Result<Option<Duration>> {
    let input: String = Input::new()
        .with_prompt("單一指令逾時秒數（留空表示不限制）")
        .default(String::new())
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            parse_timeout(input).map(|_| ())
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("逾時設定輸入失敗: {}", e)))?;
    parse_timeout(&input).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

pub fn get_check_exit_status_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否同時檢查結束代碼？（否：僅依輸出中的 'Error N:' 判斷）")
        .default(true)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("結束代碼選項輸入失敗: {}", e)))
}

pub fn get_log_level_option() -> io::Result<String> {
    let index = Select::new()
        .with_prompt("選擇日誌等級")
        .items(&LOG_LEVELS)
        .default(0)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("日誌等級選擇失敗: {}", e)))?;
    Ok(LOG_LEVELS[index].to_string())
}

fn parse_timeout(input: &str) -> Result<Option<Duration>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(0) | Err(_) => Err(format!("'{}' 不是大於 0 的整數秒數", trimmed)),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
    }
}

// 交互配置適配器
pub struct InteractiveConfigAdapter {
    source: String,
    output: String,
    format: String,
}

impl InteractiveConfigAdapter {
    pub fn new(source: String, output: String, format: String) -> Self {
        InteractiveConfigAdapter { source, output, format }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let timeout = get_timeout_option()?;
        let check_exit_status = get_check_exit_status_option()?;
        let log_level = get_log_level_option()?;

        Ok(AppConfig {
            source: validate_source_path(&self.source)?,
            output: validate_destination_dir(&self.output)?,
            format: self.format.parse::<ImageFormat>()?,
            sips: DEFAULT_SIPS.to_string(),
            iconutil: DEFAULT_ICONUTIL.to_string(),
            shell: DEFAULT_SHELL.to_string(),
            timeout,
            check_exit_status,
            no_progress: false,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timeout_means_unlimited() {
        assert_eq!(parse_timeout("  "), Ok(None));
    }

    #[test]
    fn timeout_parses_seconds() {
        assert_eq!(parse_timeout("30"), Ok(Some(Duration::from_secs(30))));
    }

    #[test]
    fn zero_or_text_timeout_is_rejected() {
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }
}
