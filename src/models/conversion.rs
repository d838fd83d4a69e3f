use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 支援的目標格式，標籤同時作為 `sips -s format` 的參數與輸出副檔名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Heic,
    Png,
    Tiff,
    Icns,
    Bmp,
    Gif,
    Pdf,
    Psd,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 9] = [
        ImageFormat::Jpeg,
        ImageFormat::Heic,
        ImageFormat::Png,
        ImageFormat::Tiff,
        ImageFormat::Icns,
        ImageFormat::Bmp,
        ImageFormat::Gif,
        ImageFormat::Pdf,
        ImageFormat::Psd,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Heic => "heic",
            ImageFormat::Png => "png",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Icns => "icns",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Gif => "gif",
            ImageFormat::Pdf => "pdf",
            ImageFormat::Psd => "psd",
        }
    }

    /// 多解析度圖示包（.icns）需走 iconset 組裝流程
    pub fn is_icon_bundle(&self) -> bool {
        matches!(self, ImageFormat::Icns)
    }

    pub fn tags() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.tag()).collect()
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ImageFormat {
    type Err = io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        ImageFormat::ALL
            .iter()
            .copied()
            .find(|f| f.tag() == tag)
            .ok_or_else(|| io::Error::new(
                io::ErrorKind::Unsupported,
                format!("不支援的目標格式 '{}'，可用格式：{}", s, ImageFormat::tags().join(", "))
            ))
    }
}

/// 單次轉換請求，建立後不可變
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    source_path: PathBuf,
    destination_dir: PathBuf,
    target_format: ImageFormat,
    base_name: String,
}

impl ConversionRequest {
    /// 建立轉換請求，任一欄位為空時回傳 `InvalidInput`（前置條件未滿足）
    pub fn new(
        source_path: impl Into<PathBuf>,
        destination_dir: impl Into<PathBuf>,
        target_format: &str,
    ) -> io::Result<Self> {
        let source_path = source_path.into();
        let destination_dir = destination_dir.into();

        let mut missing = Vec::new();
        if source_path.as_os_str().is_empty() {
            missing.push("來源檔案");
        }
        if destination_dir.as_os_str().is_empty() {
            missing.push("輸出目錄");
        }
        if target_format.trim().is_empty() {
            missing.push("目標格式");
        }
        if !missing.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("前置條件未滿足：缺少{}", missing.join("、"))
            ));
        }

        let target_format = target_format.parse::<ImageFormat>()?;
        // 絕對路徑讓以 '-' 開頭的檔名不會被工具當成選項
        let source_path = std::path::absolute(&source_path)?;
        let destination_dir = std::path::absolute(&destination_dir)?;
        let base_name = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("無法從來源路徑取得檔名：{}", source_path.display())
            ))?;

        Ok(ConversionRequest {
            source_path,
            destination_dir,
            target_format,
            base_name,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn destination_dir(&self) -> &Path {
        &self.destination_dir
    }

    pub fn target_format(&self) -> ImageFormat {
        self.target_format
    }

    /// 來源檔名（去除副檔名）
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// 輸出檔案：`<輸出目錄>/<來源檔名>.<格式標籤>`
    pub fn output_path(&self) -> PathBuf {
        self.destination_dir
            .join(format!("{}.{}", self.base_name, self.target_format.tag()))
    }
}

/// 轉換器執行選項
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    pub sips_program: String,
    pub iconutil_program: String,
    pub check_exit_status: bool,
    pub no_progress: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub raw_output_text: String,
    pub succeeded: bool,
    pub error_message: String,
}

impl ConversionResult {
    pub fn success(raw_output_text: impl Into<String>) -> Self {
        ConversionResult {
            raw_output_text: raw_output_text.into(),
            succeeded: true,
            error_message: String::new(),
        }
    }

    pub fn failure(raw_output_text: impl Into<String>, error_message: impl Into<String>) -> Self {
        ConversionResult {
            raw_output_text: raw_output_text.into(),
            succeeded: false,
            error_message: error_message.into(),
        }
    }
}

#[derive(Debug)]
pub struct ConversionOutput {
    pub output_path: PathBuf,
    pub result: ConversionResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_tag() {
        for format in ImageFormat::ALL {
            assert_eq!(format.tag().parse::<ImageFormat>().unwrap(), format);
        }
        assert_eq!(" ICNS ".parse::<ImageFormat>().unwrap(), ImageFormat::Icns);
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        let err = "webp".parse::<ImageFormat>().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn only_icns_is_icon_bundle() {
        let bundles: Vec<_> = ImageFormat::ALL.iter().filter(|f| f.is_icon_bundle()).collect();
        assert_eq!(bundles, vec![&ImageFormat::Icns]);
    }

    #[test]
    fn missing_fields_fail_precondition() {
        let err = ConversionRequest::new("", "/tmp", "png").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err = ConversionRequest::new("/a/b.png", "", "png").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err = ConversionRequest::new("/a/b.png", "/tmp", "  ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn output_path_uses_base_name_and_tag() {
        let request = ConversionRequest::new("/photos/My Trip.HEIC", "/out dir", "jpeg").unwrap();

        assert_eq!(request.base_name(), "My Trip");
        assert_eq!(request.output_path(), PathBuf::from("/out dir/My Trip.jpeg"));
        assert_eq!(request.output_path().parent().unwrap(), request.destination_dir());
    }

    #[test]
    fn relative_paths_are_made_absolute() {
        let request = ConversionRequest::new("-n.png", "out", "gif").unwrap();
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(request.source_path(), cwd.join("-n.png").as_path());
        assert!(request.source_path().is_absolute());
        assert!(!request.source_path().to_string_lossy().starts_with('-'));
        assert_eq!(request.base_name(), "-n");
        assert_eq!(request.output_path(), cwd.join("out").join("-n.gif"));
    }

    #[test]
    fn source_without_file_name_is_rejected() {
        let err = ConversionRequest::new("/", "/tmp", "png").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
