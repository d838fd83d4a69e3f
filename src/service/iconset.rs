use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use log::{debug, info, warn};
use crate::models::iconset::{IconsetWorkspace, ICONSET_SUFFIX};
use crate::service::traits::i_service::IconsetServiceTrait;
use crate::utils::utils::generate_random_suffix;

const WORKSPACE_PREFIX: &str = "iconvert-";
const MAX_ATTEMPTS: usize = 8;

/// Iconset 服務，在暫存根目錄下建立 `iconvert-<隨機>/<檔名>.iconset`
pub struct IconsetService {
    temp_root: PathBuf,
}

impl IconsetService {
    pub fn new() -> Self {
        IconsetService { temp_root: env::temp_dir() }
    }

    pub fn with_root(temp_root: impl Into<PathBuf>) -> Self {
        IconsetService { temp_root: temp_root.into() }
    }
}

impl Default for IconsetService {
    fn default() -> Self {
        Self::new()
    }
}

impl IconsetServiceTrait for IconsetService {
    fn create_workspace(&self, base_name: &str) -> io::Result<IconsetWorkspace> {
        for _ in 0..MAX_ATTEMPTS {
            let root = self.temp_root.join(format!("{}{}", WORKSPACE_PREFIX, generate_random_suffix(8)));
            // create_dir 在目錄已存在時失敗，確保同一來源的並行轉換不共用目錄
            match fs::create_dir(&root) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!("暫存目錄名稱衝突，重新產生：{}", root.display());
                    continue;
                }
                Err(e) => return Err(e),
            }

            let iconset_dir = root.join(format!("{}{}", base_name, ICONSET_SUFFIX));
            let workspace = IconsetWorkspace { root, iconset_dir };
            if let Err(e) = fs::create_dir(&workspace.iconset_dir) {
                self.remove_workspace(&workspace);
                return Err(e);
            }
            info!("建立暫存工作區：{}", workspace.iconset_dir.display());
            return Ok(workspace);
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("無法在 {} 建立唯一的暫存目錄", self.temp_root.display())
        ))
    }

    fn remove_workspace(&self, workspace: &IconsetWorkspace) {
        match fs::remove_dir_all(&workspace.root) {
            Ok(()) => debug!("已清除暫存工作區：{}", workspace.root.display()),
            Err(e) => warn!("清除暫存工作區 {} 失敗: {}", workspace.root.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn workspace_is_named_after_source() {
        let tmp = TempDir::new().unwrap();
        let service = IconsetService::with_root(tmp.path());

        let workspace = service.create_workspace("My Icon").unwrap();

        assert!(workspace.iconset_dir.is_dir());
        assert_eq!(workspace.iconset_dir.file_name().unwrap(), "My Icon.iconset");
        assert_eq!(workspace.iconset_dir.parent().unwrap(), workspace.root.as_path());
        assert!(workspace.root.starts_with(tmp.path()));
    }

    #[test]
    fn overlapping_runs_get_distinct_workspaces() {
        let tmp = TempDir::new().unwrap();
        let service = IconsetService::with_root(tmp.path());

        let first = service.create_workspace("logo").unwrap();
        let second = service.create_workspace("logo").unwrap();

        assert_ne!(first.root, second.root);
        assert!(first.iconset_dir.is_dir());
        assert!(second.iconset_dir.is_dir());
    }

    #[test]
    fn remove_deletes_whole_tree() {
        let tmp = TempDir::new().unwrap();
        let service = IconsetService::with_root(tmp.path());
        let workspace = service.create_workspace("logo").unwrap();
        fs::write(workspace.iconset_dir.join("icon_16x16.png"), b"png").unwrap();

        service.remove_workspace(&workspace);

        assert!(!workspace.root.exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn removing_twice_is_harmless() {
        let tmp = TempDir::new().unwrap();
        let service = IconsetService::with_root(tmp.path());
        let workspace = service.create_workspace("logo").unwrap();

        service.remove_workspace(&workspace);
        service.remove_workspace(&workspace);
    }

    #[test]
    fn missing_temp_root_is_an_error() {
        let service = IconsetService::with_root("/nonexistent/iconvert-root");
        assert!(service.create_workspace("logo").is_err());
    }
}
