// ==========================================
// 销售数据 ETL 系统 - 存储连接 Trait
// ==========================================
// 职责: 关系型存储的最小接口 + 作用域会话
// 红线: 会话结束（含出错 / 提前返回）时必定断开连接
// ==========================================

use crate::repository::error::{StoreError, StoreResult};
use rusqlite::types::Value;
use std::ops::{Deref, DerefMut};
use tracing::debug;

// ==========================================
// StoreConnection Trait
// ==========================================
// 实现者: SqliteStore（测试中另有脚本化 mock）
pub trait StoreConnection: Send {
    /// 建立连接
    ///
    /// # 返回
    /// - true: 连接成功
    /// - false: 连接失败（错误已记录日志）
    fn connect(&mut self) -> bool;

    /// 执行单条语句，返回影响行数
    fn execute(&mut self, statement: &str, params: &[Value]) -> StoreResult<usize>;

    /// 以多组参数执行同一语句，返回影响行数
    fn executemany(&mut self, statement: &str, rows: &[Vec<Value>]) -> StoreResult<usize>;

    /// 查询单个整数（如 COUNT(*)）
    fn query_scalar(&mut self, statement: &str) -> StoreResult<i64>;

    /// 提交当前事务
    fn commit(&mut self) -> StoreResult<()>;

    /// 回滚当前事务
    fn rollback(&mut self) -> StoreResult<()>;

    /// 断开连接（幂等）
    fn disconnect(&mut self);
}

// ==========================================
// StoreSession - 作用域会话
// ==========================================
// 打开即连接，Drop 时断开
pub struct StoreSession<'a, S: StoreConnection + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: StoreConnection + ?Sized> StoreSession<'a, S> {
    pub fn open(store: &'a mut S) -> StoreResult<Self> {
        if !store.connect() {
            return Err(StoreError::ConnectionFailure(
                "无法建立数据库连接".to_string(),
            ));
        }
        debug!("存储会话已打开");
        Ok(Self { store })
    }
}

impl<S: StoreConnection + ?Sized> Deref for StoreSession<'_, S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        self.store
    }
}

impl<S: StoreConnection + ?Sized> DerefMut for StoreSession<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.store
    }
}

impl<S: StoreConnection + ?Sized> Drop for StoreSession<'_, S> {
    fn drop(&mut self) {
        self.store.disconnect();
        debug!("存储会话已关闭");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingStore {
        accept: bool,
        connects: usize,
        disconnects: usize,
    }

    impl StoreConnection for CountingStore {
        fn connect(&mut self) -> bool {
            self.connects += 1;
            self.accept
        }
        fn execute(&mut self, _: &str, _: &[Value]) -> StoreResult<usize> {
            Ok(0)
        }
        fn executemany(&mut self, _: &str, rows: &[Vec<Value>]) -> StoreResult<usize> {
            Ok(rows.len())
        }
        fn query_scalar(&mut self, _: &str) -> StoreResult<i64> {
            Ok(0)
        }
        fn commit(&mut self) -> StoreResult<()> {
            Ok(())
        }
        fn rollback(&mut self) -> StoreResult<()> {
            Ok(())
        }
        fn disconnect(&mut self) {
            self.disconnects += 1;
        }
    }

    #[test]
    fn test_session_disconnects_on_drop() {
        let mut store = CountingStore {
            accept: true,
            ..Default::default()
        };

        {
            let mut session = StoreSession::open(&mut store).unwrap();
            session.execute("SELECT 1", &[]).unwrap();
        }

        assert_eq!(store.connects, 1);
        assert_eq!(store.disconnects, 1);
    }

    #[test]
    fn test_session_connect_failure() {
        let mut store = CountingStore::default();

        let result = StoreSession::open(&mut store);

        assert!(matches!(result, Err(StoreError::ConnectionFailure(_))));
        drop(result);
        assert_eq!(store.disconnects, 0);
    }
}
