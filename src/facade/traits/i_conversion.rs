use std::io;
use crate::models::conversion::{ConversionOutput, ConversionRequest};

// Facade 接口，負責協調圖片轉換流程
pub trait ConversionFacadeTrait: Send + Sync {
    /// 執行一次圖片轉換
    /// # 參數
    /// - request: 來源檔案、輸出目錄與目標格式
    /// # 回傳
    /// - 外部工具執行完畢時返回轉換結果（成功或失敗），無法啟動工具或建立暫存目錄時返回 IO 錯誤
    fn execute_conversion(&self, request: ConversionRequest) -> io::Result<ConversionOutput>;
}
