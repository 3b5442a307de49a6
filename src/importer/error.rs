// ==========================================
// 销售数据 ETL 系统 - 抽取模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 抽取模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 结构错误 =====
    #[error("源文件缺少必需列: {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
}

impl ImportError {
    /// 是否为"源文件不存在"类错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, ImportError::FileNotFound(_))
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ImportError::FileNotFound(err.to_string())
        } else {
            ImportError::FileReadError(err.to_string())
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ImportError = io.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_schema_mismatch_message_lists_columns() {
        let err = ImportError::SchemaMismatch {
            missing: vec!["fecha".to_string(), "total".to_string()],
        };
        assert_eq!(err.to_string(), "源文件缺少必需列: fecha, total");
    }
}
