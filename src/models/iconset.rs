use std::path::PathBuf;

/// iconutil 要求輸入目錄以此結尾
pub const ICONSET_SUFFIX: &str = ".iconset";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconVariant {
    pub pixel_width: u32,
    pub scale: u32,
}

impl IconVariant {
    pub const fn new(pixel_width: u32, scale: u32) -> Self {
        IconVariant { pixel_width, scale }
    }

    /// 實際輸出的像素邊長
    pub fn pixels(&self) -> u32 {
        self.pixel_width * self.scale
    }

    pub fn file_name(&self) -> String {
        let retina = if self.scale != 1 { "@2x" } else { "" };
        format!("icon_{0}x{0}{1}.png", self.pixel_width, retina)
    }
}

pub static ICON_VARIANTS: [IconVariant; 10] = [
    IconVariant::new(16, 1),
    IconVariant::new(16, 2),
    IconVariant::new(32, 1),
    IconVariant::new(32, 2),
    IconVariant::new(128, 1),
    IconVariant::new(128, 2),
    IconVariant::new(256, 1),
    IconVariant::new(256, 2),
    IconVariant::new(512, 1),
    IconVariant::new(512, 2),
];

/// 單次 .icns 轉換使用的暫存工作區
#[derive(Debug, Clone)]
pub struct IconsetWorkspace {
    /// 隨機命名的上層目錄，清理時整個刪除
    pub root: PathBuf,
    pub iconset_dir: PathBuf,
}
