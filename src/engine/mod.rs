// ==========================================
// 销售数据 ETL 系统 - 引擎层
// ==========================================
// 职责: 装载（批量写入 + 提交策略）与整体编排
// 红线: 引擎不拼业务 SQL，语句统一由 repository::sales_table 提供
// ==========================================

pub mod batch_loader;
pub mod error;
pub mod orchestrator;

pub use batch_loader::{BatchLoader, LoadMode, LoadOutcome, DEFAULT_BATCH_SIZE};
pub use error::{EtlError, EtlResult, RunFailure, EXIT_FAILURE, EXIT_INTERRUPTED};
pub use orchestrator::{new_execution_id, PipelineOrchestrator};
