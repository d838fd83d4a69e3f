use std::io;
use std::time::Duration;
use clap::Parser;
use crate::action::interactive::process_interactive_mode;
use crate::config::config::{Cli, DEFAULT_ICONUTIL, DEFAULT_LOG_LEVEL, DEFAULT_SHELL, DEFAULT_SIPS, validate_destination_dir, validate_source_path};
use crate::config::ports::{AppConfig, ConfigPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{ConversionOutput, ImageFormat};
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::utils::utils::setup_logging;

pub fn process_args(args: Vec<String>) -> io::Result<ConversionOutput> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<ConversionOutput> {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))?;

    // 檢查是否僅提供來源、輸出目錄與格式（預設配置）
    let is_default_config = cli.sips.is_none()
        && cli.iconutil.is_none()
        && cli.shell.is_none()
        && cli.timeout.is_none()
        && !cli.ignore_exit_status
        && !cli.no_progress
        && cli.log_level.is_none();

    // 選擇配置適配器
    let config_port: Box<dyn ConfigPort> = if is_default_config {
        log::info!("未提供選項參數，使用預設配置：sips、iconutil、/bin/sh，不設逾時");
        Box::new(DefaultConfigAdapter::new(cli.source.clone(), cli.output.clone(), cli.format.clone()))
    } else {
        Box::new(CliConfigAdapter::new(cli.clone()))
    };

    let config_service = ConfigService::new(config_port);
    let config = config_service.get_config()?;

    let output = run_conversion(&config)?;

    // 若啟用 --show-config，在轉換後顯示配置
    if cli.show_config {
        println!("實際使用的配置：{:#?}", config);
    }

    Ok(output)
}

/// 依配置建立轉換請求並執行一次
pub fn run_conversion(config: &AppConfig) -> io::Result<ConversionOutput> {
    let request = config.to_request()?;
    let facade: Box<dyn ConversionFacadeTrait> = Box::new(ConversionFacade::from_config(config));
    facade.execute_conversion(request)
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let source = validate_source_path(&self.cli.source)?;
        let output = validate_destination_dir(&self.cli.output)?;
        let format = self.cli.format.parse::<ImageFormat>()?;

        if self.cli.ignore_exit_status {
            log::warn!("已停用結束代碼檢查，僅依輸出中的 'Error N:' 判斷成敗");
        }
        if self.cli.timeout == Some(0) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "逾時秒數必須大於 0"));
        }

        Ok(AppConfig {
            source,
            output,
            format,
            sips: self.cli.sips.clone().unwrap_or(DEFAULT_SIPS.to_string()),
            iconutil: self.cli.iconutil.clone().unwrap_or(DEFAULT_ICONUTIL.to_string()),
            shell: self.cli.shell.clone().unwrap_or(DEFAULT_SHELL.to_string()),
            timeout: self.cli.timeout.map(Duration::from_secs),
            check_exit_status: !self.cli.ignore_exit_status,
            no_progress: self.cli.no_progress,
            log_level: self.cli.log_level.clone().unwrap_or(DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_adapter_resolves_options() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("shot.heic");
        fs::write(&source, b"heic").unwrap();
        let cli = parse(&[
            "iconvert",
            source.to_str().unwrap(),
            "-o", tmp.path().to_str().unwrap(),
            "-f", "png",
            "--sips", "/usr/bin/sips",
            "--timeout", "15",
            "--ignore-exit-status",
            "--no-progress",
        ]);

        let config = CliConfigAdapter::new(cli).get_config().unwrap();

        assert_eq!(config.format, ImageFormat::Png);
        assert_eq!(config.sips, "/usr/bin/sips");
        assert_eq!(config.iconutil, "iconutil");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert!(!config.check_exit_status);
        assert!(config.no_progress);
        assert_eq!(config.to_request().unwrap().output_path(), tmp.path().join("shot.png"));
    }

    #[test]
    fn cli_adapter_rejects_zero_timeout() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("shot.png");
        fs::write(&source, b"png").unwrap();
        let cli = parse(&[
            "iconvert", source.to_str().unwrap(), "-o", tmp.path().to_str().unwrap(), "-f", "gif", "--timeout", "0",
        ]);

        let err = CliConfigAdapter::new(cli).get_config().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn cli_adapter_rejects_missing_destination() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("shot.png");
        fs::write(&source, b"png").unwrap();
        let cli = parse(&["iconvert", source.to_str().unwrap(), "-o", "/nonexistent/out", "-f", "gif"]);

        assert!(CliConfigAdapter::new(cli).get_config().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn run_conversion_classifies_real_commands() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("my shot.png");
        fs::write(&source, b"png").unwrap();
        // 以 echo 與 false 代替 sips
        let config = AppConfig {
            source: source.clone(),
            output: tmp.path().to_path_buf(),
            format: ImageFormat::Jpeg,
            sips: "echo".to_string(),
            iconutil: "true".to_string(),
            shell: "/bin/sh".to_string(),
            timeout: Some(Duration::from_secs(10)),
            check_exit_status: true,
            no_progress: true,
            log_level: "info".to_string(),
        };

        let output = run_conversion(&config).unwrap();

        assert!(output.result.succeeded);
        assert!(output.result.raw_output_text.contains("my shot.png"));
        assert_eq!(output.output_path, tmp.path().join("my shot.jpeg"));

        let failing = AppConfig { sips: "false".to_string(), ..config };
        let output = run_conversion(&failing).unwrap();
        assert!(!output.result.succeeded);
        assert_eq!(output.result.error_message, "指令結束代碼：1");
    }
}
