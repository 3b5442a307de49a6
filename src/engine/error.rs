// ==========================================
// 销售数据 ETL 系统 - 运行级错误类型
// ==========================================
// 工具: thiserror 派生宏
// 退出码: 中断 130，其余失败 1
// ==========================================

use crate::domain::metrics::RunMetrics;
use crate::domain::types::Stage;
use crate::importer::error::ImportError;
use crate::repository::error::StoreError;
use crate::transform::error::TransformError;
use thiserror::Error;

/// 用户中断时的进程退出码
pub const EXIT_INTERRUPTED: u8 = 130;

/// 其余失败的进程退出码
pub const EXIT_FAILURE: u8 = 1;

/// 管道运行错误
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("抽取失败: {0}")]
    Extract(#[from] ImportError),

    #[error("转换失败: {0}")]
    Transform(#[from] TransformError),

    #[error("存储失败: {0}")]
    Store(#[from] StoreError),

    #[error("批次写入失败 (批次 {batch}/{total_batches}, 已提交 {committed_rows} 行): {source}")]
    BatchInsertFailed {
        batch: usize,
        total_batches: usize,
        committed_rows: usize,
        #[source]
        source: StoreError,
    },

    #[error("运行被用户中断 (阶段 {stage})")]
    Interrupted { stage: Stage },
}

impl EtlError {
    /// 出错阶段
    pub fn stage(&self) -> Stage {
        match self {
            EtlError::Extract(_) => Stage::Extract,
            EtlError::Transform(_) => Stage::Transform,
            EtlError::Store(_) | EtlError::BatchInsertFailed { .. } => Stage::Load,
            EtlError::Interrupted { stage } => *stage,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, EtlError::Interrupted { .. })
    }

    /// 进程退出码
    pub fn exit_code(&self) -> u8 {
        if self.is_interrupted() {
            EXIT_INTERRUPTED
        } else {
            EXIT_FAILURE
        }
    }
}

/// Result 类型别名
pub type EtlResult<T> = Result<T, EtlError>;

// ==========================================
// RunFailure - 失败运行
// ==========================================
// 携带已定稿（FAILED）的运行报告与原始错误
#[derive(Error, Debug)]
#[error("ETL 运行失败 [{}]: {}", .metrics.execution_id, .error)]
pub struct RunFailure {
    pub metrics: RunMetrics,
    #[source]
    pub error: EtlError,
}

impl RunFailure {
    pub fn exit_code(&self) -> u8 {
        self.error.exit_code()
    }
}
