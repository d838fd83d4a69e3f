use std::io;
use std::process::Stdio;
use std::time::Duration;
use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use crate::models::shell::{ExitState, ShellCommand, ShellOutput};
use crate::service::traits::i_service::ShellServiceTrait;

/// 透過 `<shell> -c` 執行外部指令，stderr 併入 stdout
pub struct ShellService {
    shell: String,
    timeout: Option<Duration>,
}

impl ShellService {
    pub fn new(shell: impl Into<String>, timeout: Option<Duration>) -> Self {
        ShellService {
            shell: shell.into(),
            timeout,
        }
    }

    /// `exec` 讓逾時時被終止的是工具本身而非外層 shell
    fn script(command: &ShellCommand) -> String {
        format!("exec {} 2>&1", command.render())
    }

    async fn run_script(&self, script: &str) -> io::Result<ShellOutput> {
        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| io::Error::new(e.kind(), format!("無法啟動 {}：{}", self.shell, e)))?;

        let mut stdout = child.stdout.take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "無法取得指令的標準輸出"))?;
        let mut stderr = child.stderr.take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "無法取得指令的錯誤輸出"))?;
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        // 逾時時回傳 Err(limit)，已讀到的輸出仍留在緩衝區
        let finished = {
            let drain = async {
                let (out, err) = tokio::join!(
                    read_available(&mut stdout, &mut stdout_buf),
                    read_available(&mut stderr, &mut stderr_buf)
                );
                out?;
                err?;
                child.wait().await
            };
            match self.timeout {
                Some(limit) => tokio::select! {
                    status = drain => Ok(status?),
                    _ = tokio::time::sleep(limit) => Err(limit),
                },
                None => Ok(drain.await?),
            }
        };

        let status = match finished {
            Ok(status) => match status.code() {
                Some(code) => ExitState::Exited(code),
                None => ExitState::Signaled,
            },
            Err(limit) => {
                warn!("指令逾時（{} 秒），已終止：{}", limit.as_secs_f64(), script);
                if let Err(e) = child.kill().await {
                    warn!("無法終止逾時的指令：{}", e);
                }
                ExitState::TimedOut(limit)
            }
        };

        let mut text = String::from_utf8_lossy(&stdout_buf).to_string();
        // shell 本身的錯誤（例如找不到指令）不受 2>&1 影響
        if !stderr_buf.is_empty() {
            text.push_str(&String::from_utf8_lossy(&stderr_buf));
        }

        Ok(ShellOutput { text, status })
    }
}

/// 逐段讀到串流結束；中途被取消時，已讀取的部分保留在 `buf`
async fn read_available<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<()> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

impl ShellServiceTrait for ShellService {
    fn run(&self, command: &ShellCommand) -> io::Result<ShellOutput> {
        let script = Self::script(command);
        debug!("執行指令：{} -c {}", self.shell, script);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let output = runtime.block_on(self.run_script(&script))?;

        debug!("指令結束：{:?}，輸出 {} 位元組", output.status, output.text.len());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(timeout: Option<Duration>) -> ShellService {
        ShellService::new("/bin/sh", timeout)
    }

    #[test]
    fn special_characters_round_trip() {
        let path = "/tmp/My Pictures/it's a \"$HOME\" `test` & more;.png";
        let cmd = ShellCommand::new("printf").arg("%s").arg(path);

        let output = sh(None).run(&cmd).unwrap();

        assert_eq!(output.text, path);
        assert!(output.is_success());
    }

    #[test]
    fn stderr_is_merged_into_text() {
        let cmd = ShellCommand::new("ls").arg("/nonexistent-iconvert-dir");

        let output = sh(None).run(&cmd).unwrap();

        assert!(!output.text.is_empty());
        assert!(!output.is_success());
    }

    #[test]
    fn reports_exit_code() {
        let cmd = ShellCommand::new("sh").arg("-c").arg("echo 'Error 7: nope'; exit 4");

        let output = sh(None).run(&cmd).unwrap();

        assert_eq!(output.text, "Error 7: nope\n");
        assert_eq!(output.status, ExitState::Exited(4));
    }

    #[test]
    fn slow_command_times_out() {
        let limit = Duration::from_millis(200);
        let cmd = ShellCommand::new("sleep").arg("5");

        let output = sh(Some(limit)).run(&cmd).unwrap();

        assert_eq!(output.status, ExitState::TimedOut(limit));
    }

    #[test]
    fn timed_out_command_keeps_output_written_so_far() {
        let limit = Duration::from_millis(500);
        let cmd = ShellCommand::new("sh").arg("-c").arg("echo 'Error 5: x'; sleep 5");

        let output = sh(Some(limit)).run(&cmd).unwrap();

        assert_eq!(output.status, ExitState::TimedOut(limit));
        assert!(output.text.contains("Error 5: x"));
    }

    #[test]
    fn missing_shell_is_an_error() {
        let service = ShellService::new("/nonexistent/shell", None);
        assert!(service.run(&ShellCommand::new("true")).is_err());
    }
}
