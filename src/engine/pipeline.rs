// ==========================================
// StockWise 库存预测系统 - 导入处理管线
// ==========================================
// 职责: 单次导入请求的端到端编排
// 流程: 格式探测 → 列识别 → 取账户映射 → 消耗聚合
//       → 预测 → 结果落库 → 预警评估 → 预警入库
// 并发: 管线内同步单线程;不同账户的请求可并行,
//       共享状态仅限外部存储（按连接锁串行化写入）
// ==========================================

use crate::config::AppConfig;
use crate::domain::alert::AlertRecord;
use crate::domain::forecast::ForecastSet;
use crate::domain::recipe::RecipeMapping;
use crate::domain::sales::ResolvedSchema;
use crate::engine::alert_policy::AlertPolicy;
use crate::engine::error::EngineError;
use crate::engine::forecast_engine::ForecastEngine;
use crate::engine::usage_aggregator::UsageAggregator;
use crate::importer::column_resolver::ColumnResolver;
use crate::importer::error::ImportError;
use crate::importer::format_detector::FormatDetector;
use crate::notify::NotificationSink;
use crate::repository::error::RepositoryError;
use crate::repository::{AlertLogStore, ForecastResultStore, MappingStore};
use chrono::{NaiveDateTime, Utc};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

// ==========================================
// PipelineError - 管线错误
// ==========================================

/// 管线级错误（聚合各层错误）
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

// ==========================================
// PipelineOutcome - 管线结果
// ==========================================

/// 单次导入请求的完整结果
#[derive(Debug)]
pub struct PipelineOutcome {
    pub account_key: String,
    pub schema: ResolvedSchema,
    pub forecasts: ForecastSet,
    pub alerts: Vec<AlertRecord>,
    /// 未命中配方的品项（字典序,诊断用途）
    pub unmatched_items: Vec<String>,
    pub processed_at: NaiveDateTime,
}

// ==========================================
// ForecastPipeline - 导入处理管线
// ==========================================

pub struct ForecastPipeline {
    detector: FormatDetector,
    resolver: ColumnResolver,
    aggregator: UsageAggregator,
    forecast_engine: ForecastEngine,
    alert_policy: AlertPolicy,
    default_mapping: RecipeMapping,
    mapping_store: Arc<dyn MappingStore>,
    result_store: Arc<dyn ForecastResultStore>,
    alert_log: Arc<dyn AlertLogStore>,
    sink: Arc<dyn NotificationSink>,
}

impl ForecastPipeline {
    pub fn new(
        config: &AppConfig,
        mapping_store: Arc<dyn MappingStore>,
        result_store: Arc<dyn ForecastResultStore>,
        alert_log: Arc<dyn AlertLogStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            detector: FormatDetector::new(),
            resolver: ColumnResolver::new(),
            aggregator: UsageAggregator::new(),
            forecast_engine: ForecastEngine::with_default_stock(config.default_stock_oz),
            alert_policy: AlertPolicy::with_test_mode(
                config.low_stock_threshold_days,
                config.test_mode,
            ),
            default_mapping: config.default_mapping.clone(),
            mapping_store,
            result_store,
            alert_log,
            sink,
        }
    }

    /// 处理一个销售导出文件
    ///
    /// # 参数
    /// - file_path: 销售导出文件路径（.csv）
    /// - account_key: 账户键（同时作为预警接收方）
    /// - stock_levels: 当前库存（盎司）;键缺失的原料用默认库存,
    ///   显式 0 保留为 0
    ///
    /// # 返回
    /// - Ok(PipelineOutcome): 预测 + 预警结果
    /// - Err(PipelineError): 格式/列识别/无匹配/存储错误,中止本次请求
    pub fn run(
        &self,
        file_path: &Path,
        account_key: &str,
        stock_levels: &HashMap<String, f64>,
    ) -> Result<PipelineOutcome, PipelineError> {
        tracing::info!(file = %file_path.display(), account_key, "开始处理导入请求");

        // 1. 格式探测
        let table = self.detector.detect(file_path)?;

        // 2. 列识别
        let schema = self.resolver.resolve(&table)?;

        // 3. 账户映射（未配置时回退注入的默认映射）
        let mapping = match self.mapping_store.get(account_key)? {
            Some(mapping) => mapping,
            None => {
                tracing::debug!(account_key, "账户未配置映射,使用默认配方映射");
                self.default_mapping.clone()
            }
        };

        // 4. 消耗聚合
        let summary = self.aggregator.aggregate(&table, &schema, &mapping)?;

        // 5. 预测
        let forecasts = self.forecast_engine.forecast(&summary.daily_usage, stock_levels);

        // 6. 结果落库
        let processed_at = Utc::now().naive_utc();
        self.result_store.put(account_key, &forecasts, processed_at)?;

        // 7. 预警评估（通知失败只记录,不中止）
        let alerts = self.alert_policy.evaluate(&forecasts, self.sink.as_ref(), account_key);

        // 8. 预警入库（尽力而为,失败不影响结果返回）
        if let Err(e) = self.alert_log.record(account_key, &alerts) {
            tracing::warn!(error = %e, "预警记录入库失败");
        }

        tracing::info!(
            account_key,
            ingredients = forecasts.len(),
            alerts = alerts.len(),
            "导入请求处理完成"
        );

        Ok(PipelineOutcome {
            account_key: account_key.to_string(),
            schema,
            forecasts,
            alerts,
            unmatched_items: summary.unmatched_items(),
            processed_at,
        })
    }
}
