//! 日志初始化
//!
//! `tracing-subscriber` fmt 输出 + `EnvFilter`，`RUST_LOG` 优先于默认级别。
//! `log` crate 的记录通过 `tracing-log` 桥接进来。

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Failed to bridge log records: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// 以 `info` 为默认级别初始化日志
pub fn init_logger() -> Result<(), LoggerError> {
    init_logger_with("info")
}

/// 以给定指令为默认过滤器初始化日志（如 `"debug"`、`"info,bpc::frames=debug"`）
///
/// 只能成功调用一次；重复调用返回错误。
pub fn init_logger_with(default_directives: &str) -> Result<(), LoggerError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_log::LogTracer::init()?;
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // 同一进程内只有第一次调用能安装全局订阅者
        let first = init_logger_with("debug");
        let second = init_logger();
        assert!(first.is_ok());
        assert!(second.is_err());
    }
}
