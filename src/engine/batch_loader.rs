// ==========================================
// 销售数据 ETL 系统 - 批量装载器
// ==========================================
// 流程:
// 1. 打开存储会话（作用域结束必定断开）
// 2. 建表（不存在时）
// 3. 全量刷新：清空目标表
// 4. 分批 INSERT（批次间检查中断标志）
// 5. 写入拒绝记录（失败只告警）
// 6. 统计目标表行数
// ==========================================

use crate::domain::sales::{CleanSalesRecord, RecordSet, RejectedRecord};
use crate::domain::types::Stage;
use crate::engine::error::{EtlError, EtlResult};
use crate::repository::error::StoreResult;
use crate::repository::sales_table::{
    rejected_row, sales_row, COUNT_SALES, CREATE_REJECTED_TABLE, CREATE_SALES_TABLE,
    INSERT_REJECTED, INSERT_SALES, REJECTED_TABLE, SALES_TABLE, TRUNCATE_SALES,
};
use crate::repository::store::{StoreConnection, StoreSession};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// 默认批次大小
pub const DEFAULT_BATCH_SIZE: usize = 1000;

// ==========================================
// LoadMode - 提交策略
// ==========================================
// PerBatch: 清空先提交，每批独立提交（失败时保留已提交批次）
// Atomic: 清空 + 全部批次同一事务，结束时一次提交
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    #[default]
    PerBatch,
    Atomic,
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadMode::PerBatch => write!(f, "per_batch"),
            LoadMode::Atomic => write!(f, "atomic"),
        }
    }
}

impl FromStr for LoadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_batch" => Ok(LoadMode::PerBatch),
            "atomic" => Ok(LoadMode::Atomic),
            other => Err(format!("未知装载模式: {}", other)),
        }
    }
}

/// 装载结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOutcome {
    pub inserted: usize,
    pub rejected: usize,
    pub table_row_count: i64,
}

// ==========================================
// BatchLoader - 批量装载器
// ==========================================
pub struct BatchLoader {
    batch_size: usize,
    load_mode: LoadMode,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, LoadMode::default())
    }
}

impl BatchLoader {
    /// # 参数
    /// - batch_size: 每批行数（至少为 1）
    /// - load_mode: 提交策略
    pub fn new(batch_size: usize, load_mode: LoadMode) -> Self {
        Self {
            batch_size: batch_size.max(1),
            load_mode,
            cancel: None,
        }
    }

    /// 绑定中断标志（批次之间检查）
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn load_mode(&self) -> LoadMode {
        self.load_mode
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// 全量刷新装载
    ///
    /// # 返回
    /// - Ok(LoadOutcome): 写入行数 / 拒绝记录数 / 目标表行数
    /// - Err(BatchInsertFailed): 第 k 批失败，后续批次不再尝试
    /// - Err(Interrupted): 中断标志已设置
    #[instrument(skip_all, fields(records = clean.len(), mode = %self.load_mode))]
    pub fn load<S: StoreConnection + ?Sized>(
        &self,
        store: &mut S,
        clean: &RecordSet<CleanSalesRecord>,
        rejected: &[RejectedRecord],
        execution_id: &str,
    ) -> EtlResult<LoadOutcome> {
        let mut session = StoreSession::open(store)?;

        Self::ensure_tables(&mut *session)?;
        self.truncate(&mut *session)?;
        let inserted = self.insert_batches(&mut *session, clean)?;
        let rejected = Self::record_rejected(&mut *session, rejected, execution_id);
        let table_row_count = session.query_scalar(COUNT_SALES)?;

        info!(
            inserted,
            rejected,
            table_row_count,
            "装载完成"
        );

        Ok(LoadOutcome {
            inserted,
            rejected,
            table_row_count,
        })
    }

    fn ensure_tables<S: StoreConnection + ?Sized>(store: &mut S) -> EtlResult<()> {
        let result = store
            .execute(CREATE_SALES_TABLE, &[])
            .and_then(|_| store.execute(CREATE_REJECTED_TABLE, &[]))
            .and_then(|_| store.commit());
        if let Err(e) = result {
            Self::abort(store);
            return Err(e.into());
        }
        debug!(tables = ?[SALES_TABLE, REJECTED_TABLE], "目标表就绪");
        Ok(())
    }

    fn truncate<S: StoreConnection + ?Sized>(&self, store: &mut S) -> EtlResult<()> {
        let mut result: StoreResult<()> = Ok(());
        for statement in TRUNCATE_SALES {
            result = result.and_then(|_| store.execute(statement, &[]).map(|_| ()));
        }
        if self.load_mode == LoadMode::PerBatch {
            result = result.and_then(|_| store.commit());
        }
        if let Err(e) = result {
            Self::abort(store);
            return Err(e.into());
        }
        info!(table = SALES_TABLE, "目标表已清空");
        Ok(())
    }

    fn insert_batches<S: StoreConnection + ?Sized>(
        &self,
        store: &mut S,
        clean: &RecordSet<CleanSalesRecord>,
    ) -> EtlResult<usize> {
        let rows: Vec<Vec<Value>> = clean.iter().map(sales_row).collect();
        let total_batches = rows.len().div_ceil(self.batch_size);
        let per_batch = self.load_mode == LoadMode::PerBatch;

        let mut inserted = 0usize;
        let mut committed_rows = 0usize;

        for (idx, chunk) in rows.chunks(self.batch_size).enumerate() {
            let batch = idx + 1;

            if self.is_cancelled() {
                Self::abort(store);
                warn!(batch, total_batches, committed_rows, "装载被中断");
                return Err(EtlError::Interrupted { stage: Stage::Load });
            }

            let result = store.executemany(INSERT_SALES, chunk).and_then(|n| {
                if per_batch {
                    store.commit()?;
                }
                Ok(n)
            });

            match result {
                Ok(n) => {
                    inserted += n;
                    if per_batch {
                        committed_rows += n;
                    }
                    info!(batch, total_batches, rows = n, "批次写入完成");
                }
                Err(source) => {
                    Self::abort(store);
                    error!(batch, total_batches, committed_rows, error = %source, "批次写入失败");
                    return Err(EtlError::BatchInsertFailed {
                        batch,
                        total_batches,
                        committed_rows,
                        source,
                    });
                }
            }
        }

        if !per_batch {
            if let Err(e) = store.commit() {
                Self::abort(store);
                return Err(e.into());
            }
        }

        Ok(inserted)
    }

    /// 写入拒绝记录；失败只告警，不影响运行结果
    fn record_rejected<S: StoreConnection + ?Sized>(
        store: &mut S,
        rejected: &[RejectedRecord],
        execution_id: &str,
    ) -> usize {
        if rejected.is_empty() {
            return 0;
        }

        let rows: Vec<Vec<Value>> = rejected
            .iter()
            .map(|r| rejected_row(execution_id, r))
            .collect();

        let result = store
            .executemany(INSERT_REJECTED, &rows)
            .and_then(|n| store.commit().map(|_| n));

        match result {
            Ok(n) => {
                info!(count = n, table = REJECTED_TABLE, "拒绝记录已写入");
                n
            }
            Err(e) => {
                Self::abort(store);
                warn!(error = %e, "拒绝记录写入失败");
                0
            }
        }
    }

    fn abort<S: StoreConnection + ?Sized>(store: &mut S) {
        if let Err(e) = store.rollback() {
            warn!(error = %e, "回滚失败");
        }
    }
}
