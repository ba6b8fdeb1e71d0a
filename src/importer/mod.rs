// ==========================================
// StockWise 库存预测系统 - 导入层
// ==========================================
// 职责: 外部销售导出文件 → RawTable + ResolvedSchema
// 支持: 多编码/多分隔符 CSV（含 TSV 与整行引号包裹格式）
// ==========================================

// 模块声明
pub mod column_resolver;
pub mod data_cleaner;
pub mod error;
pub mod format_detector;

// 重导出核心类型
pub use column_resolver::{
    find_column, ColumnResolver, RolePattern, DATE_PATTERN, ITEM_PATTERN, QUANTITY_PATTERN,
};
pub use data_cleaner::SalesDataCleaner;
pub use error::{ImportError, ImportResult};
pub use format_detector::FormatDetector;
