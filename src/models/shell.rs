use std::time::Duration;

/// 外部指令：程式名稱與依序排列的參數
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: String,
    args: Vec<String>,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        ShellCommand {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// 取得指定旗標後的第一個參數，例如 `-o` 的輸出路徑
    pub fn value_after(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// 產生交給 shell 解譯的指令字串，每個片段皆以單引號包覆
    pub fn render(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| quote(part))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// POSIX 單引號跳脫：`'` 轉為 `'\''`
pub fn quote(part: &str) -> String {
    format!("'{}'", part.replace('\'', r"'\''"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Exited(i32),
    Signaled,
    TimedOut(Duration),
}

/// 指令執行結果，`text` 為合併後的 stdout 與 stderr
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    pub text: String,
    pub status: ExitState,
}

impl ShellOutput {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ExitState::Exited(0))
    }
}
