// ==========================================
// StockWise 库存预测系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
///
/// FormatUndetected 与 SchemaUnresolved 中止整个导入请求，
/// 并携带面向用户的诊断信息。
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

    // ===== 格式探测错误 =====
    #[error("文件格式无法识别，所有解析策略均失败:\n{attempts}")]
    FormatUndetected {
        /// 逐条策略的失败摘要（每行一条）
        attempts: String,
    },

    // ===== 列识别错误 =====
    #[error(
        "无法自动识别必需列。\n现有列: {columns}\n请确认文件包含日期/时间列与品项/商品列"
    )]
    SchemaUnresolved {
        /// 实际找到的列名（逗号分隔）
        columns: String,
    },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
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
