// ==========================================
// 销售数据 ETL 系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 流程: 抽取（CSV）→ 转换（清洗 / 去重 / 校验）→ 装载（全量替换）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与指标
pub mod domain;

// 抽取层 - 外部数据
pub mod importer;

// 转换层 - 清洗规则 / 去重 / 校验
pub mod transform;

// 存储层 - 连接与事务
pub mod repository;

// 引擎层 - 装载与编排
pub mod engine;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    CleanSalesRecord, RecordSet, RejectedRecord, RejectionReason, RunMetrics, RunStatus,
    SalesColumn, SalesRecord, Stage, StageMetrics, TransformStats,
};

pub use config::EtlConfig;
pub use engine::{BatchLoader, EtlError, LoadMode, PipelineOrchestrator, RunFailure};
pub use importer::SalesExtractor;
pub use repository::{SqliteStore, StoreConnection, StoreSession};
pub use transform::{Deduplicator, Transformer, Validator};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "销售数据 ETL 系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
