// ==========================================
// 销售数据 ETL 系统 - 存储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 存储层错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("数据库连接失败: {0}")]
    ConnectionFailure(String),

    #[error("数据库未连接")]
    NotConnected,

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("约束违反: {0}")]
    ConstraintViolation(String),

    #[error("语句执行失败: {0}")]
    StatementFailure(String),

    #[error("数据库事务失败: {0}")]
    TransactionFailure(String),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    StoreError::UniqueConstraintViolation(msg)
                } else if msg.contains("constraint") || msg.contains("CONSTRAINT") {
                    StoreError::ConstraintViolation(msg)
                } else {
                    StoreError::StatementFailure(msg)
                }
            }
            _ => StoreError::StatementFailure(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
