// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing / tracing-subscriber / tracing-appender
// 控制台: INFO（RUST_LOG 可覆写），可选 JSON 格式
// 日志文件: DEBUG，持久追加写入 logs_dir/log_filename
// 仅由二进制入口调用，库内组件只使用 tracing 宏
// ==========================================

use crate::config::LogConfig;
use std::path::PathBuf;
use thiserror::Error;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// 输出格式环境变量（取值 json 时控制台输出结构化 JSON）
pub const LOG_FORMAT_ENV: &str = "ETL_LOG_FORMAT";

/// 日志文件初始化错误
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("日志目录创建失败 ({path}): {source}")]
    LogsDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("日志文件初始化失败: {0}")]
    Appender(#[from] InitError),
}

/// 文件日志层（DEBUG 级别，无 ANSI 颜色）
///
/// 返回的 WorkerGuard 释放时刷新缓冲区，须持有到进程结束
pub fn file_layer<S>(log: &LogConfig) -> Result<(impl Layer<S>, WorkerGuard), LoggingError>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    std::fs::create_dir_all(&log.logs_dir).map_err(|source| LoggingError::LogsDir {
        path: log.logs_dir.clone(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(log.log_filename.as_str())
        .build(&log.logs_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(LevelFilter::DEBUG);

    Ok((layer, guard))
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 控制台日志级别过滤器（默认: info）
/// - ETL_LOG_FORMAT: json | text（默认: text）
///
/// 日志文件无法创建时仅输出到控制台并给出警告；
/// 返回值须在 main 中持有，以保证退出前日志落盘
///
/// # 示例
/// ```no_run
/// use ventas_etl::config::LogConfig;
/// use ventas_etl::logging;
/// let _guard = logging::init(&LogConfig::default());
/// ```
pub fn init(log: &LogConfig) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let console_layer = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_line_number(true)
            .boxed()
    };

    let (file, guard, file_error) = match file_layer(log) {
        Ok((layer, guard)) => (Some(layer), Some(guard), None),
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(console_layer.with_filter(console_filter))
        .with(file)
        .init();

    match file_error {
        Some(e) => tracing::warn!(error = %e, "日志文件不可用，仅输出到控制台"),
        None => tracing::debug!(path = %log.log_path().display(), "日志文件已启用"),
    }

    guard
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
