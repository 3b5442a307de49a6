// ==========================================
// 销售数据 ETL 系统 - 管道编排器
// ==========================================
// 流程: 抽取 → 转换 → 装载（顺序执行，阶段间检查中断）
// 红线: 无论成功 / 失败 / 中断，定稿与汇总日志都会执行
// ==========================================

use crate::config::EtlConfig;
use crate::domain::metrics::{RunMetrics, StageMetrics};
use crate::domain::types::{RunStatus, Stage};
use crate::engine::batch_loader::BatchLoader;
use crate::engine::error::{EtlError, EtlResult, RunFailure};
use crate::importer::SalesExtractor;
use crate::repository::sqlite_store::SqliteStore;
use crate::repository::store::StoreConnection;
use crate::transform::Transformer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

/// 生成运行标识（UUID v4 前 8 位十六进制）
pub fn new_execution_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

// ==========================================
// PipelineOrchestrator - 管道编排器
// ==========================================
pub struct PipelineOrchestrator<S: StoreConnection> {
    config: EtlConfig,
    extractor: SalesExtractor,
    transformer: Transformer,
    loader: BatchLoader,
    store: S,
    cancel: Arc<AtomicBool>,
}

impl PipelineOrchestrator<SqliteStore> {
    /// 按配置创建 SQLite 目标库的编排器
    pub fn from_config(config: EtlConfig) -> Self {
        let store = SqliteStore::new(config.store.db_path.clone(), config.store.busy_timeout());
        Self::new(config, store)
    }
}

impl<S: StoreConnection> PipelineOrchestrator<S> {
    pub fn new(config: EtlConfig, store: S) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let loader =
            BatchLoader::new(config.batch_size, config.load_mode).with_cancel_flag(cancel.clone());

        Self {
            config,
            extractor: SalesExtractor::default(),
            transformer: Transformer::default(),
            loader,
            store,
            cancel,
        }
    }

    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.transformer = transformer;
        self
    }

    /// 中断标志（设置后在下一个检查点停止）
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 执行一次完整运行
    ///
    /// # 返回
    /// - Ok(RunMetrics): 状态 COMPLETED
    /// - Err(RunFailure): 状态 FAILED，携带已定稿的运行报告与错误
    pub fn run(&mut self) -> Result<RunMetrics, RunFailure> {
        let mut metrics = RunMetrics::start(new_execution_id());
        let span = info_span!("etl_run", execution_id = %metrics.execution_id);
        let _guard = span.enter();

        info!("==================================================");
        info!(
            source = %self.config.csv_path().display(),
            db_path = %self.config.store.db_path,
            batch_size = self.loader.batch_size(),
            load_mode = %self.loader.load_mode(),
            "ETL 运行开始"
        );

        let result = self.run_stages(&mut metrics);

        match &result {
            Ok(()) => metrics.mark_completed(),
            Err(e) if e.is_interrupted() => {
                warn!(stage = %e.stage(), "运行被用户中断");
                metrics.mark_failed(e.to_string());
            }
            Err(e) => {
                error!(stage = %e.stage(), error = %e, "运行失败");
                metrics.mark_failed(e.to_string());
            }
        }

        metrics.finalize();
        Self::log_summary(&metrics);

        match result {
            Ok(()) => Ok(metrics),
            Err(error) => Err(RunFailure { metrics, error }),
        }
    }

    fn check_cancel(&self, next: Stage) -> EtlResult<()> {
        if self.cancel.load(Ordering::SeqCst) {
            return Err(EtlError::Interrupted { stage: next });
        }
        Ok(())
    }

    fn run_stages(&mut self, metrics: &mut RunMetrics) -> EtlResult<()> {
        // === 阶段 1: 抽取 ===
        self.check_cancel(Stage::Extract)?;
        info!(stage = %Stage::Extract, "阶段开始");
        let started = Instant::now();
        let raw = self.extractor.extract(&self.config.csv_path())?;
        metrics.record_stage(StageMetrics::new(
            Stage::Extract,
            0,
            raw.len(),
            started.elapsed(),
        ));

        // === 阶段 2: 转换 ===
        self.check_cancel(Stage::Transform)?;
        info!(stage = %Stage::Transform, "阶段开始");
        let records_in = raw.len();
        let started = Instant::now();
        let output = self.transformer.transform(raw)?;
        metrics.record_stage(
            StageMetrics::new(
                Stage::Transform,
                records_in,
                output.clean.len(),
                started.elapsed(),
            )
            .with_rejected(output.rejected.len()),
        );
        metrics.transform_stats = Some(output.stats.clone());

        // === 阶段 3: 装载 ===
        self.check_cancel(Stage::Load)?;
        info!(stage = %Stage::Load, "阶段开始");
        let started = Instant::now();
        let outcome = self.loader.load(
            &mut self.store,
            &output.clean,
            &output.rejected,
            &metrics.execution_id,
        )?;
        metrics.record_stage(
            StageMetrics::new(
                Stage::Load,
                output.clean.len(),
                outcome.inserted,
                started.elapsed(),
            )
            .with_rejected(outcome.rejected),
        );

        Ok(())
    }

    fn log_summary(metrics: &RunMetrics) {
        info!("==================================================");
        for stage in &metrics.stages {
            info!(
                stage = %stage.stage,
                records_in = stage.records_in,
                records_out = stage.records_out,
                rejected = stage.rejected,
                duration_seconds = stage.duration_seconds(),
                "阶段汇总"
            );
        }
        let duration_seconds = metrics.duration_seconds.unwrap_or_default();
        match metrics.status {
            RunStatus::Completed => info!(
                status = %metrics.status,
                duration_seconds,
                "ETL 运行完成"
            ),
            _ => error!(
                status = %metrics.status,
                duration_seconds,
                error = metrics.error.as_deref().unwrap_or_default(),
                "ETL 运行结束"
            ),
        }
        info!("==================================================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile, TempDir};

    const HEADER: &str =
        "fecha,producto,categoria,cantidad,precio_unitario,total,cliente_id,region,vendedor";

    fn setup(rows: &[&str]) -> (TempDir, NamedTempFile, EtlConfig) {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("ventas_raw.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }

        let db_file = Builder::new().suffix(".db").tempfile().unwrap();
        let mut config = EtlConfig::default();
        config.data_dir = dir.path().to_path_buf();
        config.store.db_path = db_file.path().to_str().unwrap().to_string();
        (dir, db_file, config)
    }

    #[test]
    fn test_execution_id_format() {
        let id = new_execution_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_execution_id());
    }

    #[test]
    fn test_run_completed() {
        let (_dir, _db, config) = setup(&[
            "2024-01-05,Laptop HP,Laptops,1,2500.00,2500.00,CLI-00001,lima,Ana",
            "2024-01-06,,Accesorios,1,10.00,10.00,CLI-00002,cusco,Luis",
        ]);

        let metrics = PipelineOrchestrator::from_config(config).run().unwrap();

        assert_eq!(metrics.status, RunStatus::Completed);
        assert!(metrics.is_finalized());
        assert_eq!(metrics.stages.len(), 3);
        assert_eq!(metrics.stage(Stage::Load).unwrap().records_out, 1);
        assert_eq!(metrics.stage(Stage::Transform).unwrap().rejected, 1);
    }

    #[test]
    fn test_missing_source_fails_in_extract() {
        let (dir, _db, mut config) = setup(&[]);
        config.csv_filename = "no_existe.csv".to_string();
        drop(dir);

        let failure = PipelineOrchestrator::from_config(config).run().unwrap_err();

        assert_eq!(failure.metrics.status, RunStatus::Failed);
        assert!(failure.metrics.is_finalized());
        assert!(failure.metrics.stages.is_empty());
        assert_eq!(failure.error.stage(), Stage::Extract);
        assert_eq!(failure.exit_code(), 1);
    }

    #[test]
    fn test_cancelled_before_start() {
        let (_dir, _db, config) = setup(&[
            "2024-01-05,Laptop HP,Laptops,1,2500.00,2500.00,CLI-00001,lima,Ana",
        ]);
        let mut orchestrator = PipelineOrchestrator::from_config(config);
        orchestrator.cancel_flag().store(true, Ordering::SeqCst);

        let failure = orchestrator.run().unwrap_err();

        assert_eq!(failure.exit_code(), 130);
        assert!(failure.metrics.error.is_some());
    }
}
