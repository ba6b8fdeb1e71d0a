// ==========================================
// StockWise 库存预测系统 - 仓储层
// ==========================================
// 职责: 外部存储契约与 SQLite 实现
// 并发: 每仓储一条连接,Mutex 串行化写入（后写覆盖）
// ==========================================

// 模块声明
pub mod alert_log_repo;
pub mod error;
pub mod forecast_repo;
pub mod mapping_repo;

// 重导出核心类型
pub use alert_log_repo::{AlertLogStore, SqliteAlertLogRepo};
pub use error::{RepositoryError, RepositoryResult};
pub use forecast_repo::{ForecastResultStore, SqliteForecastRepo};
pub use mapping_repo::{MappingStore, SqliteMappingRepo};
