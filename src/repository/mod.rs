// ==========================================
// 销售数据 ETL 系统 - 存储层
// ==========================================
// 红线: 存储层不含业务逻辑
// 职责: 连接生命周期 / 事务 / 参数化语句执行
// 约束: 所有写入使用参数化，防止 SQL 注入
// ==========================================

pub mod error;
pub mod sales_table;
pub mod sqlite_store;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use sqlite_store::SqliteStore;
pub use store::{StoreConnection, StoreSession};
