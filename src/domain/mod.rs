// ==========================================
// StockWise 库存预测系统 - 领域层
// ==========================================
// 职责: 核心实体与值对象定义
// ==========================================

// 模块声明
pub mod alert;
pub mod forecast;
pub mod recipe;
pub mod sales;

// 重导出核心类型
pub use alert::{AlertRecord, AlertStatus};
pub use forecast::{DailyUsage, ForecastResult, ForecastSet, UsageSummary};
pub use recipe::{normalize_item_name, RecipeMapping};
pub use sales::{RawTable, ResolvedSchema, SaleEvent};
