// ==========================================
// 销售数据 ETL 系统 - 配置层
// ==========================================
// 职责: 运行配置（默认值 + 环境变量覆写）
// ==========================================

pub mod etl_config;

pub use etl_config::{config_keys, ConfigError, EtlConfig, LogConfig, StoreConfig};
