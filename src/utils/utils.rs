use std::io::{self, Write};
use std::time::{Duration, Instant};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use rand::distr::Alphanumeric;

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    let initialized = env_logger::Builder::new()
        .filter_level(log_level_filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init();
    if initialized.is_err() {
        log::debug!("日誌系統已初始化，略過重複設定");
    }
    Ok(())
}

pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
    start: Instant,
}

impl ProgressManager {
    pub fn new(total: u64, no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else if total == 0 {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {msg} 已耗時: {elapsed}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        } else {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:40}] {pos}/{len} ETA: {eta_precise}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
            );
            pb
        };
        ProgressManager {
            pb,
            no_progress,
            start: Instant::now(),
        }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        if self.no_progress {
            return;
        }
        let message: String = message.into();
        self.pb.set_message(message);
    }

    pub fn update(&self, count: u64, action: &str) {
        if self.no_progress {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        self.pb.set_message(format!("{}（{:.1} 秒）", action, elapsed));
        self.pb.set_position(count);
    }

    pub fn finish(&self, message: &str) {
        if self.no_progress {
            return;
        }
        self.pb.finish_with_message(message.to_string());
    }

    /// 中途失敗時停止進度顯示，保留目前位置
    pub fn abandon(&self, message: &str) {
        if self.no_progress {
            return;
        }
        self.pb.abandon_with_message(message.to_string());
    }

    pub fn is_finished(&self) -> bool {
        self.pb.is_finished()
    }
}

pub fn create_progress_bar(total: u64, no_progress: bool) -> ProgressManager {
    ProgressManager::new(total, no_progress)
}

/// 產生小寫英數隨機字串，用於暫存目錄命名
pub fn generate_random_suffix(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_suffix_is_lowercase_alphanumeric() {
        let suffix = generate_random_suffix(8);
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn setup_logging_can_run_twice() {
        assert!(setup_logging("debug").is_ok());
        assert!(setup_logging("warn").is_ok());
    }

    #[test]
    fn hidden_progress_ignores_updates() {
        let pm = create_progress_bar(10, true);
        pm.update(3, "處理中");
        pm.finish("完成");
    }

    #[test]
    fn abandoned_spinner_stops_ticking() {
        let pm = create_progress_bar(0, false);
        pm.set_message("轉換中");
        pm.abandon("轉換中斷");
        assert!(pm.is_finished());
    }
}
