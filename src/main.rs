use std::process;

use iconvert::action::cli::process_args;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    match process_args(args) {
        Ok(output) if output.result.succeeded => {
            log::info!("程式執行完成，輸出檔案：{}", output.output_path.display());
            println!("轉換完成！輸出檔案位於：{}", output.output_path.display());
        }
        Ok(output) => {
            eprintln!("轉換失敗：{}", output.result.error_message);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("錯誤：{}", e);
            process::exit(2);
        }
    }
}
