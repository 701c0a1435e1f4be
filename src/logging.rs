//! ロギング
//!
//! ライブラリ本体は `log` ファサード経由で出力する。ここではホストや付属バイナリ向けに、
//! 標準エラー出力と任意のファイルへ書き出す簡易ロガーを提供する。

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// `log` ファサード用ロガー
#[derive(Debug, Clone)]
pub struct Logger {
    level: LevelFilter,
    output_stderr: bool,
    output_file: Option<PathBuf>,
}

impl Logger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// 開発向け（debug 以上を出力）
    pub fn for_development() -> Self {
        Self::new(LevelFilter::Debug)
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// ファイルへ追記出力する
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を無効化
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    /// 出力行の書式
    pub fn format(record: &Record) -> String {
        format!("{}: [{}] {}", record.level(), record.target(), record.args())
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(path) = &self.output_file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", message);
            }
        }
    }

    /// グローバルロガーとして登録
    pub fn install(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.write_line(&Self::format(record));
        }
    }

    fn flush(&self) {}
}

/// 指定レベルで標準エラー出力ロガーを登録
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    Logger::new(level).install()
}
