// ==========================================
// Mock 存储实现 - 用于故障注入测试
// ==========================================
// 行为: 内存中模拟 ventas / ventas_rejected 的行数与事务
// 故障: 第 k 次 executemany 返回错误；可拒绝连接
// ==========================================

#![allow(dead_code)]

use rusqlite::types::Value;
use ventas_etl::repository::{StoreConnection, StoreError, StoreResult};

/// 调用记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Connect,
    Execute(String),
    ExecuteMany { target: String, rows: usize },
    QueryScalar,
    Commit,
    Rollback,
    Disconnect,
}

#[derive(Debug, Default)]
pub struct ScriptedStore {
    pub calls: Vec<StoreCall>,
    pub committed_sales: usize,
    pub committed_rejected: usize,
    pending_sales: usize,
    pending_rejected: usize,
    pending_truncate: bool,
    executemany_count: usize,
    fail_on_executemany: Option<usize>,
    refuse_connect: bool,
    connected: bool,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 目标表已有的行数（模拟上一次运行的结果）
    pub fn with_existing_rows(mut self, rows: usize) -> Self {
        self.committed_sales = rows;
        self
    }

    /// 第 k 次（从 1 开始）executemany 失败
    pub fn failing_on_executemany(mut self, k: usize) -> Self {
        self.fail_on_executemany = Some(k);
        self
    }

    pub fn refusing_connect(mut self) -> Self {
        self.refuse_connect = true;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn executemany_count(&self) -> usize {
        self.executemany_count
    }

    fn visible_sales(&self) -> usize {
        let base = if self.pending_truncate {
            0
        } else {
            self.committed_sales
        };
        base + self.pending_sales
    }

    fn ensure_connected(&self) -> StoreResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(StoreError::NotConnected)
        }
    }
}

fn target_of(statement: &str) -> &'static str {
    if statement.contains("ventas_rejected") {
        "ventas_rejected"
    } else {
        "ventas"
    }
}

impl StoreConnection for ScriptedStore {
    fn connect(&mut self) -> bool {
        self.calls.push(StoreCall::Connect);
        if self.refuse_connect {
            return false;
        }
        self.connected = true;
        true
    }

    fn execute(&mut self, statement: &str, _params: &[Value]) -> StoreResult<usize> {
        self.ensure_connected()?;
        self.calls.push(StoreCall::Execute(statement.trim().to_string()));
        if statement.trim() == "DELETE FROM ventas" {
            self.pending_truncate = true;
            self.pending_sales = 0;
        }
        Ok(0)
    }

    fn executemany(&mut self, statement: &str, rows: &[Vec<Value>]) -> StoreResult<usize> {
        self.ensure_connected()?;
        self.executemany_count += 1;
        let target = target_of(statement);
        self.calls.push(StoreCall::ExecuteMany {
            target: target.to_string(),
            rows: rows.len(),
        });

        if self.fail_on_executemany == Some(self.executemany_count) {
            return Err(StoreError::StatementFailure("injected failure".to_string()));
        }

        if target == "ventas_rejected" {
            self.pending_rejected += rows.len();
        } else {
            self.pending_sales += rows.len();
        }
        Ok(rows.len())
    }

    fn query_scalar(&mut self, _statement: &str) -> StoreResult<i64> {
        self.ensure_connected()?;
        self.calls.push(StoreCall::QueryScalar);
        Ok(self.visible_sales() as i64)
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.ensure_connected()?;
        self.calls.push(StoreCall::Commit);
        self.committed_sales = self.visible_sales();
        self.committed_rejected += self.pending_rejected;
        self.pending_sales = 0;
        self.pending_rejected = 0;
        self.pending_truncate = false;
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.ensure_connected()?;
        self.calls.push(StoreCall::Rollback);
        self.pending_sales = 0;
        self.pending_rejected = 0;
        self.pending_truncate = false;
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.connected {
            self.calls.push(StoreCall::Disconnect);
        }
        self.connected = false;
    }
}
