// ==========================================
// StockWise 库存预测系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 销售导出 → 原料消耗 → 库存天数预测与预警
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 通知层 - 预警投递
pub mod notify;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    AlertRecord, AlertStatus, DailyUsage, ForecastResult, ForecastSet, RawTable, RecipeMapping,
    ResolvedSchema, SaleEvent, UsageSummary,
};

// 引擎
pub use engine::{
    AlertPolicy, ForecastEngine, ForecastPipeline, PipelineError, PipelineOutcome, UsageAggregator,
};

// 导入
pub use importer::{ColumnResolver, FormatDetector, ImportError, SalesDataCleaner};

// 仓储
pub use repository::{
    AlertLogStore, ForecastResultStore, MappingStore, SqliteAlertLogRepo, SqliteForecastRepo,
    SqliteMappingRepo,
};

// 通知
pub use notify::{ConsoleNotifier, NotificationError, NotificationSink};

// 配置
pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "StockWise 库存预测系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================
