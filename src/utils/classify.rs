use std::sync::LazyLock;
use regex::Regex;
use crate::models::conversion::ConversionResult;
use crate::models::shell::{ExitState, ShellOutput};

// sips 的錯誤輸出格式，例如 "Error 4: no file was specified"
static ERROR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Error \d+:.*").expect("錯誤樣式必須是合法的正規表示式")
});

/// 找出第一段符合 `Error <數字>:` 的文字，只取到該行結尾
pub fn find_error_message(text: &str) -> Option<&str> {
    ERROR_PATTERN
        .find(text)
        .map(|m| m.as_str().trim_end_matches('\r'))
}

/// 僅依輸出文字判斷成敗
pub fn classify_output(text: &str) -> ConversionResult {
    match find_error_message(text) {
        Some(message) => ConversionResult::failure(text, message),
        None => ConversionResult::success(text),
    }
}

/// 綜合輸出文字與結束狀態判斷成敗，文字中的錯誤訊息優先。
/// 逾時一律視為失敗，不受 `check_exit_status` 影響。
pub fn evaluate_output(output: &ShellOutput, check_exit_status: bool) -> ConversionResult {
    let result = classify_output(&output.text);
    if !result.succeeded {
        return result;
    }

    match output.status {
        ExitState::TimedOut(limit) => ConversionResult::failure(
            &output.text,
            format!("指令逾時（{} 秒）", limit.as_secs_f64()),
        ),
        _ if !check_exit_status => result,
        ExitState::Exited(0) => result,
        ExitState::Exited(code) => ConversionResult::failure(&output.text, format!("指令結束代碼：{}", code)),
        ExitState::Signaled => ConversionResult::failure(&output.text, "指令被訊號終止"),
    }
}
