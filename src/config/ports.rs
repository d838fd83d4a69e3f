use std::io;
use std::path::PathBuf;
use std::time::Duration;
use crate::models::conversion::{ConversionOptions, ConversionRequest, ImageFormat};

// 應用配置結構體，封裝所有參數
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: PathBuf,
    pub output: PathBuf,
    pub format: ImageFormat,
    pub sips: String,
    pub iconutil: String,
    pub shell: String,
    pub timeout: Option<Duration>,
    pub check_exit_status: bool,
    pub no_progress: bool,
    pub log_level: String,
}

impl AppConfig {
    pub fn to_request(&self) -> io::Result<ConversionRequest> {
        ConversionRequest::new(self.source.clone(), self.output.clone(), self.format.tag())
    }

    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            sips_program: self.sips.clone(),
            iconutil_program: self.iconutil.clone(),
            check_exit_status: self.check_exit_status,
            no_progress: self.no_progress,
        }
    }
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> io::Result<AppConfig>;
}
