// ==========================================
// 销售数据 ETL 系统 - 命令行入口
// ==========================================
// 用法:
//   ventas-etl [csv_path] [db_path]
// 退出码: 0 成功 / 1 失败 / 130 用户中断
// ==========================================

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use tracing::{error, info, warn};
use ventas_etl::config::EtlConfig;
use ventas_etl::engine::{PipelineOrchestrator, EXIT_FAILURE, EXIT_INTERRUPTED};
use ventas_etl::logging;

/// 读取配置并应用命令行位置参数覆写
fn load_config() -> anyhow::Result<EtlConfig> {
    let mut config = EtlConfig::from_env().context("读取环境变量配置失败")?;

    let mut args = std::env::args().skip(1);
    if let Some(csv_path) = args.next() {
        let csv_path = PathBuf::from(csv_path);
        config.csv_filename = csv_path
            .file_name()
            .context("源文件路径缺少文件名")?
            .to_string_lossy()
            .to_string();
        config.data_dir = csv_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
    }
    if let Some(db_path) = args.next() {
        config.store.db_path = db_path;
    }

    config.validate().context("配置校验失败")?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // .env 可能包含 RUST_LOG / ETL_LOG_FORMAT / ETL_LOGS_DIR，需在日志初始化前加载
    dotenvy::dotenv().ok();
    let config = load_config();
    let log_config = config.as_ref().map(|c| c.log.clone()).unwrap_or_default();
    // 持有到 main 结束，保证日志文件落盘
    let _log_guard = logging::init(&log_config);

    info!("==================================================");
    info!(version = ventas_etl::VERSION, "{}", ventas_etl::APP_NAME);
    info!("==================================================");

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %format!("{:#}", e), "配置加载失败");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let csv_path = config.csv_path();
    if !csv_path.exists() {
        warn!(path = %csv_path.display(), "源文件不存在，请先生成或放置数据文件");
        return ExitCode::from(EXIT_FAILURE);
    }

    let mut orchestrator = PipelineOrchestrator::from_config(config);
    let cancel = orchestrator.cancel_flag();
    let mut handle = tokio::task::spawn_blocking(move || orchestrator.run());

    let mut interrupted = false;
    let joined = tokio::select! {
        joined = &mut handle => joined,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("收到中断信号，等待当前批次结束并释放连接");
            interrupted = true;
            cancel.store(true, Ordering::SeqCst);
            handle.await
        }
    };

    match joined {
        Ok(_) if interrupted => ExitCode::from(EXIT_INTERRUPTED),
        Ok(Ok(metrics)) => {
            info!(
                execution_id = %metrics.execution_id,
                duration_seconds = metrics.duration_seconds.unwrap_or_default(),
                "ETL 运行成功"
            );
            ExitCode::SUCCESS
        }
        Ok(Err(failure)) => {
            error!(execution_id = %failure.metrics.execution_id, error = %failure, "ETL 运行失败");
            ExitCode::from(failure.exit_code())
        }
        Err(e) => {
            error!(error = %e, "运行线程异常退出");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
