// ==========================================
// 销售数据 ETL 系统 - SQLite 存储实现
// ==========================================
// 职责: StoreConnection 的 rusqlite 实现
// 事务: 首条写语句时隐式 BEGIN，commit / rollback 结束
// 红线: 断开前回滚未提交的工作
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{StoreError, StoreResult};
use crate::repository::store::StoreConnection;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct SqliteStore {
    db_path: String,
    busy_timeout: Duration,
    conn: Option<Connection>,
}

impl SqliteStore {
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 为内存库）
    /// - busy_timeout: 锁等待超时
    pub fn new(db_path: impl Into<String>, busy_timeout: Duration) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout,
            conn: None,
        }
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn connection(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotConnected)
    }

    /// 取得连接并确保处于事务中
    fn transactional(&self) -> StoreResult<&Connection> {
        let conn = self.connection()?;
        if conn.is_autocommit() {
            conn.execute_batch("BEGIN")
                .map_err(|e| StoreError::TransactionFailure(e.to_string()))?;
        }
        Ok(conn)
    }
}

impl StoreConnection for SqliteStore {
    fn connect(&mut self) -> bool {
        if self.conn.is_some() {
            return true;
        }
        match open_sqlite_connection(&self.db_path, self.busy_timeout) {
            Ok(conn) => {
                info!(db_path = %self.db_path, "数据库连接成功");
                self.conn = Some(conn);
                true
            }
            Err(e) => {
                error!(db_path = %self.db_path, error = %e, "数据库连接失败");
                false
            }
        }
    }

    fn execute(&mut self, statement: &str, params: &[Value]) -> StoreResult<usize> {
        let conn = self.transactional()?;
        Ok(conn.execute(statement, params_from_iter(params.iter()))?)
    }

    fn executemany(&mut self, statement: &str, rows: &[Vec<Value>]) -> StoreResult<usize> {
        let conn = self.transactional()?;
        let mut stmt = conn.prepare_cached(statement)?;

        let mut count = 0;
        for row in rows {
            count += stmt.execute(params_from_iter(row.iter()))?;
        }
        Ok(count)
    }

    fn query_scalar(&mut self, statement: &str) -> StoreResult<i64> {
        let conn = self.connection()?;
        Ok(conn.query_row(statement, [], |row| row.get(0))?)
    }

    fn commit(&mut self) -> StoreResult<()> {
        let conn = self.connection()?;
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT")
                .map_err(|e| StoreError::TransactionFailure(e.to_string()))?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        let conn = self.connection()?;
        if !conn.is_autocommit() {
            conn.execute_batch("ROLLBACK")
                .map_err(|e| StoreError::TransactionFailure(e.to_string()))?;
            debug!("事务已回滚");
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        if !conn.is_autocommit() {
            if let Err(e) = conn.execute_batch("ROLLBACK") {
                warn!(error = %e, "断开前回滚失败");
            }
        }
        if let Err((_, e)) = conn.close() {
            warn!(error = %e, "关闭数据库连接失败");
        }
        info!("数据库连接已关闭");
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        self.disconnect();
    }
}
