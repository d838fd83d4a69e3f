use std::io;
use crate::config::config::{DEFAULT_ICONUTIL, DEFAULT_LOG_LEVEL, DEFAULT_SHELL, DEFAULT_SIPS, validate_destination_dir, validate_source_path};
use crate::config::ports::{AppConfig, ConfigPort};
use crate::models::conversion::ImageFormat;

// 配置服務，負責選擇適當的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        self.config_port.get_config()
    }
}

// 預設配置適配器：只需來源、輸出目錄與格式，其餘使用系統工具預設值
pub struct DefaultConfigAdapter {
    source: String,
    output: String,
    format: String,
}

impl DefaultConfigAdapter {
    pub fn new(source: String, output: String, format: String) -> Self {
        DefaultConfigAdapter { source, output, format }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        Ok(AppConfig {
            source: validate_source_path(&self.source)?,
            output: validate_destination_dir(&self.output)?,
            format: self.format.parse::<ImageFormat>()?,
            sips: DEFAULT_SIPS.to_string(),
            iconutil: DEFAULT_ICONUTIL.to_string(),
            shell: DEFAULT_SHELL.to_string(),
            timeout: None, // 與系統工具相同，不設逾時
            check_exit_status: true,
            no_progress: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        })
    }
}
