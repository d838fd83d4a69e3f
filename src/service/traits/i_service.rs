use std::io;
use crate::models::iconset::IconsetWorkspace;
use crate::models::shell::{ShellCommand, ShellOutput};

// Shell 服務接口，負責執行外部指令
pub trait ShellServiceTrait: Send + Sync {
    /// 執行指令並讀取全部輸出後才返回
    /// # 參數
    /// - command: 要執行的外部指令
    /// # 回傳
    /// - 成功時返回合併後的輸出與結束狀態，無法啟動行程時返回 IO 錯誤
    fn run(&self, command: &ShellCommand) -> io::Result<ShellOutput>;
}

// Iconset 服務接口，負責 .icns 組裝所需的暫存工作區
pub trait IconsetServiceTrait: Send + Sync {
    /// 建立唯一命名的 `<檔名>.iconset` 暫存目錄
    fn create_workspace(&self, base_name: &str) -> io::Result<IconsetWorkspace>;

    /// 遞迴刪除工作區，失敗只記錄不回報
    fn remove_workspace(&self, workspace: &IconsetWorkspace);
}
