// ==========================================
// 销售数据 ETL 系统 - 运行配置
// ==========================================
// 职责: 默认值 + 环境变量覆写（.env 经 dotenvy 加载）
// 红线: 配置值显式传入编排器，不设全局实例
// ==========================================

use crate::db::DEFAULT_BUSY_TIMEOUT_MS;
use crate::engine::batch_loader::{LoadMode, DEFAULT_BATCH_SIZE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// 环境变量键
pub mod config_keys {
    pub const DATA_DIR: &str = "ETL_DATA_DIR";
    pub const CSV_FILENAME: &str = "ETL_CSV_FILENAME";
    pub const BATCH_SIZE: &str = "ETL_BATCH_SIZE";
    pub const LOAD_MODE: &str = "ETL_LOAD_MODE";
    pub const DB_PATH: &str = "ETL_DB_PATH";
    pub const BUSY_TIMEOUT_MS: &str = "ETL_BUSY_TIMEOUT_MS";
    pub const LOGS_DIR: &str = "ETL_LOGS_DIR";
    pub const LOG_FILENAME: &str = "ETL_LOG_FILENAME";
}

/// 配置错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("配置值无效 ({key}={value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("batch_size 必须大于 0")]
    ZeroBatchSize,
}

// ==========================================
// StoreConfig - 目标库配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub db_path: String,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: "ventas.db".to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

// ==========================================
// LogConfig - 日志文件配置
// ==========================================
// 控制台输出 INFO，日志文件记录 DEBUG
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub logs_dir: PathBuf,
    pub log_filename: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from("logs"),
            log_filename: "etl.log".to_string(),
        }
    }
}

impl LogConfig {
    pub fn log_path(&self) -> PathBuf {
        self.logs_dir.join(&self.log_filename)
    }
}

// ==========================================
// EtlConfig - 运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtlConfig {
    pub data_dir: PathBuf,
    pub csv_filename: String,
    pub batch_size: usize,
    pub load_mode: LoadMode,
    pub store: StoreConfig,
    pub log: LogConfig,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            csv_filename: "ventas_raw.csv".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            load_mode: LoadMode::default(),
            store: StoreConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl EtlConfig {
    /// 源文件完整路径
    pub fn csv_path(&self) -> PathBuf {
        self.data_dir.join(&self.csv_filename)
    }

    /// 加载 .env（若存在）后读取进程环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构建配置（未设置的键保持默认值）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup(config_keys::DATA_DIR) {
            config.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(config_keys::CSV_FILENAME) {
            config.csv_filename = v;
        }
        if let Some(v) = lookup(config_keys::BATCH_SIZE) {
            config.batch_size = parse_number(config_keys::BATCH_SIZE, &v)?;
        }
        if let Some(v) = lookup(config_keys::LOAD_MODE) {
            config.load_mode = v.parse::<LoadMode>().map_err(|message| ConfigError::InvalidValue {
                key: config_keys::LOAD_MODE.to_string(),
                value: v.clone(),
                message,
            })?;
        }
        if let Some(v) = lookup(config_keys::DB_PATH) {
            config.store.db_path = v;
        }
        if let Some(v) = lookup(config_keys::BUSY_TIMEOUT_MS) {
            config.store.busy_timeout_ms = parse_number(config_keys::BUSY_TIMEOUT_MS, &v)?;
        }
        if let Some(v) = lookup(config_keys::LOGS_DIR) {
            config.log.logs_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(config_keys::LOG_FILENAME) {
            config.log.log_filename = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
}
