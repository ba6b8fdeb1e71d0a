// ==========================================
// StockWise 库存预测系统 - 引擎层
// ==========================================
// 职责: 业务规则（消耗聚合 / 预测 / 预警）与管线编排
// ==========================================

// 模块声明
pub mod alert_policy;
pub mod error;
pub mod forecast_engine;
pub mod pipeline;
pub mod usage_aggregator;

// 重导出核心类型
pub use alert_policy::{AlertPolicy, DEFAULT_LOW_STOCK_THRESHOLD_DAYS, TEST_MODE_THRESHOLD_DAYS};
pub use error::{EngineError, EngineResult};
pub use forecast_engine::{ForecastEngine, DEFAULT_STOCK_OZ, ROLLING_WINDOW_DAYS};
pub use pipeline::{ForecastPipeline, PipelineError, PipelineOutcome};
pub use usage_aggregator::UsageAggregator;
