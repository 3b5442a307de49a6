// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库 / 临时源文件 / 测试配置 / 结果查询
// ==========================================

#![allow(dead_code)]

use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use ventas_etl::config::EtlConfig;
use ventas_etl::engine::LoadMode;

/// 源文件表头（固定列顺序）
pub const CSV_HEADER: &str =
    "fecha,producto,categoria,cantidad,precio_unitario,total,cliente_id,region,vendedor";

/// 创建临时测试数据库
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时路径不是 UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}

/// 样例源文件路径
pub fn sample_csv_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("ventas_sample.csv")
}

/// 在临时目录写入源文件（自动加表头）
pub fn write_sales_csv(dir: &TempDir, rows: &[&str]) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.path().join("ventas_raw.csv");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "{}", CSV_HEADER)?;
    for row in rows {
        writeln!(file, "{}", row)?;
    }
    Ok(path)
}

/// 构建指向给定源文件与数据库的配置
pub fn test_config(csv_path: &Path, db_path: &str, batch_size: usize, load_mode: LoadMode) -> EtlConfig {
    let mut config = EtlConfig::default();
    config.data_dir = csv_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    config.csv_filename = csv_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    config.store.db_path = db_path.to_string();
    config.batch_size = batch_size;
    config.load_mode = load_mode;
    config
}

/// 查询单个整数
pub fn query_i64(db_path: &str, sql: &str) -> Result<i64, Box<dyn Error>> {
    let conn = Connection::open(db_path)?;
    let value: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(value)
}

/// 生成 n 行合法的源数据行（产品名各不相同）
pub fn valid_rows(n: usize) -> Vec<String> {
    (1..=n)
        .map(|i| {
            format!(
                "2024-02-{:02},Producto {},Varios,{},10.00,,CLI-{:05},lima,Ana",
                (i % 28) + 1,
                i,
                (i % 5) + 1,
                i
            )
        })
        .collect()
}
