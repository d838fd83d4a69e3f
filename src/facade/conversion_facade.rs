use std::io;
use std::path::Path;
use log::{debug, info, warn};
use crate::config::ports::AppConfig;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{ConversionOptions, ConversionOutput, ConversionRequest, ConversionResult};
use crate::models::iconset::{IconVariant, IconsetWorkspace, ICON_VARIANTS};
use crate::models::shell::{ShellCommand, ShellOutput};
use crate::service::iconset::IconsetService;
use crate::service::shell::ShellService;
use crate::service::traits::i_service::{IconsetServiceTrait, ShellServiceTrait};
use crate::utils::classify::{evaluate_output, find_error_message};
use crate::utils::utils::create_progress_bar;

pub struct ConversionFacade {
    options: ConversionOptions,
    shell_service: Box<dyn ShellServiceTrait>,
    iconset_service: Box<dyn IconsetServiceTrait>,
}

impl ConversionFacade {
    pub fn new(
        options: ConversionOptions,
        shell_service: Box<dyn ShellServiceTrait>,
        iconset_service: Box<dyn IconsetServiceTrait>,
    ) -> Self {
        ConversionFacade {
            options,
            shell_service,
            iconset_service,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        ConversionFacade::new(
            config.conversion_options(),
            Box::new(ShellService::new(config.shell.clone(), config.timeout)),
            Box::new(IconsetService::new()),
        )
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn execute_conversion(&self, request: ConversionRequest) -> io::Result<ConversionOutput> {
        info!("開始轉換，來源：{}，輸出目錄：{}，格式：{}",
              request.source_path().display(), request.destination_dir().display(), request.target_format());

        let result = if request.target_format().is_icon_bundle() {
            self.convert_icon_bundle(&request)?
        } else {
            self.convert_format(&request)?
        };

        if result.succeeded {
            info!("轉換完成：{}", request.output_path().display());
        } else {
            warn!("轉換失敗：{}", result.error_message);
        }

        Ok(ConversionOutput {
            output_path: request.output_path(),
            result,
        })
    }
}

impl ConversionFacade {
    fn convert_format(&self, request: &ConversionRequest) -> io::Result<ConversionResult> {
        let command = self.reformat_command(request);
        let pm = create_progress_bar(0, self.options.no_progress);
        pm.set_message(format!("轉換為 {}", request.target_format()));
        let output = match self.shell_service.run(&command) {
            Ok(output) => output,
            Err(e) => {
                pm.abandon("轉換中斷");
                return Err(e);
            }
        };
        pm.finish("轉換結束");
        Ok(evaluate_output(&output, self.options.check_exit_status))
    }

    fn convert_icon_bundle(&self, request: &ConversionRequest) -> io::Result<ConversionResult> {
        let workspace = self.iconset_service.create_workspace(request.base_name())?;
        let bundled = self.render_and_bundle(request, &workspace);
        // 無論打包成功與否都要清除暫存目錄
        self.iconset_service.remove_workspace(&workspace);
        let output = bundled?;
        Ok(evaluate_output(&output, self.options.check_exit_status))
    }

    fn render_and_bundle(&self, request: &ConversionRequest, workspace: &IconsetWorkspace) -> io::Result<ShellOutput> {
        let total = ICON_VARIANTS.len();
        let pm = create_progress_bar(total as u64, self.options.no_progress);
        for (index, variant) in ICON_VARIANTS.iter().enumerate() {
            pm.update(index as u64, &format!("產生 {}", variant.file_name()));
            let command = self.resize_command(request.source_path(), variant, &workspace.iconset_dir);
            let output = match self.shell_service.run(&command) {
                Ok(output) => output,
                Err(e) => {
                    pm.abandon(&format!("產生 {} 時中斷", variant.file_name()));
                    return Err(e);
                }
            };
            debug!("{} 輸出：{}", variant.file_name(), output.text.trim_end());
            // 個別尺寸失敗不影響結果，只留下診斷紀錄
            if let Some(message) = find_error_message(&output.text) {
                warn!("產生 {} 失敗：{}", variant.file_name(), message);
            } else if !output.is_success() {
                warn!("產生 {} 時指令異常結束：{:?}", variant.file_name(), output.status);
            }
        }
        pm.update(total as u64, "打包 .icns");
        pm.finish("圖示尺寸產生完成");

        let command = self.bundle_command(&workspace.iconset_dir, &request.output_path());
        self.shell_service.run(&command)
    }

    /// `sips -s format <格式> <來源> -o <輸出檔案>`
    fn reformat_command(&self, request: &ConversionRequest) -> ShellCommand {
        ShellCommand::new(&self.options.sips_program)
            .arg("-s")
            .arg("format")
            .arg(request.target_format().tag())
            .arg(path_arg(request.source_path()))
            .arg("-o")
            .arg(path_arg(&request.output_path()))
    }

    /// `sips -s format png -z <px> <px> <來源> -o <iconset>/<檔名>`
    fn resize_command(&self, source: &Path, variant: &IconVariant, iconset_dir: &Path) -> ShellCommand {
        let pixels = variant.pixels().to_string();
        ShellCommand::new(&self.options.sips_program)
            .arg("-s")
            .arg("format")
            .arg("png")
            .arg("-z")
            .arg(pixels.clone())
            .arg(pixels)
            .arg(path_arg(source))
            .arg("-o")
            .arg(path_arg(&iconset_dir.join(variant.file_name())))
    }

    /// `iconutil -c icns <iconset> -o <輸出檔案>`
    fn bundle_command(&self, iconset_dir: &Path, output_path: &Path) -> ShellCommand {
        ShellCommand::new(&self.options.iconutil_program)
            .arg("-c")
            .arg("icns")
            .arg(path_arg(iconset_dir))
            .arg("-o")
            .arg(path_arg(output_path))
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
