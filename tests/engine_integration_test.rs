// ==========================================
// 引擎间集成测试
// ==========================================
// 职责: 验证多个引擎之间的协作和数据流转
// 场景: FormatDetector → ColumnResolver → UsageAggregator
//       → ForecastEngine → AlertPolicy 组合测试
// ==========================================


use std::collections::HashMap;
use stockwise::domain::RecipeMapping;
use stockwise::engine::{AlertPolicy, EngineError, ForecastEngine, UsageAggregator};
use stockwise::importer::{ColumnResolver, FormatDetector};
use test_helpers::RecordingNotifier;

// ==========================================
// 测试辅助函数
// ==========================================

/// 解析字节串并识别列
fn detect_and_resolve(
    bytes: &[u8],
) -> (stockwise::domain::RawTable, stockwise::domain::ResolvedSchema) {
    let table = FormatDetector::new().detect_bytes(bytes).unwrap();
    let schema = ColumnResolver::new().resolve(&table).unwrap();
    (table, schema)
}

/// 只含 Latte → milk 8 盎司的映射
fn latte_mapping() -> RecipeMapping {
    let mut mapping = RecipeMapping::new();
    mapping.insert("Latte", &[("milk", 8.0)]);
    mapping
}

// ==========================================
// 聚合 → 预测
// ==========================================

#[test]
fn test_sales_to_forecast_flow() {
    // 两天各 10 杯 Latte → 每天 80 盎司牛奶
    let (table, schema) = detect_and_resolve(
        b"date,item,quantity\n\
          2025-01-01,Latte,10\n\
          2025-01-02,Latte,10\n",
    );

    let summary = UsageAggregator::new()
        .aggregate(&table, &schema, &latte_mapping())
        .unwrap();

    let mut stock = HashMap::new();
    stock.insert("milk".to_string(), 100.0);
    let forecasts = ForecastEngine::new().forecast(&summary.daily_usage, &stock);

    let milk = &forecasts["milk"];
    assert_eq!(milk.daily_avg_usage_oz, 80.0);
    assert_eq!(milk.current_stock_oz, 100.0);
    assert_eq!(milk.days_remaining, 1.25);
}

#[test]
fn test_gap_days_count_as_zero_usage() {
    // 01-01 与 01-04 有销售,中间两天计为 0 消耗
    let (table, schema) = detect_and_resolve(
        b"date,item,quantity\n\
          2025-01-01,Latte,5\n\
          2025-01-04,Latte,5\n",
    );

    let summary = UsageAggregator::new()
        .aggregate(&table, &schema, &latte_mapping())
        .unwrap();
    let forecasts =
        ForecastEngine::new().forecast(&summary.daily_usage, &HashMap::new());

    // (40 + 0 + 0 + 40) / 4 = 20
    assert_eq!(forecasts["milk"].daily_avg_usage_oz, 20.0);
}

#[test]
fn test_missing_quantity_column_counts_each_row_as_one() {
    let (table, schema) = detect_and_resolve(
        b"date,item\n\
          2025-01-01,Latte\n\
          2025-01-01,Latte\n",
    );
    assert!(schema.quantity_column.is_none());

    let summary = UsageAggregator::new()
        .aggregate(&table, &schema, &latte_mapping())
        .unwrap();
    let forecasts =
        ForecastEngine::new().forecast(&summary.daily_usage, &HashMap::new());

    // 每行按 1 杯计 → 2 × 8 盎司
    assert_eq!(forecasts["milk"].daily_avg_usage_oz, 16.0);
}

#[test]
fn test_item_matching_is_case_insensitive() {
    let (table, schema) = detect_and_resolve(
        b"date,item,quantity\n\
          2025-01-01,LATTE,1\n\
          2025-01-01,\"  latte  \",1\n",
    );

    let summary = UsageAggregator::new()
        .aggregate(&table, &schema, &latte_mapping())
        .unwrap();
    let forecasts =
        ForecastEngine::new().forecast(&summary.daily_usage, &HashMap::new());

    assert_eq!(forecasts["milk"].daily_avg_usage_oz, 16.0);
}

#[test]
fn test_no_recipe_match_lists_both_sides() {
    let (table, schema) = detect_and_resolve(
        b"date,item,quantity\n\
          2025-01-01,Espresso,1\n\
          2025-01-01,Green Tea,2\n",
    );

    let err = UsageAggregator::new()
        .aggregate(&table, &schema, &latte_mapping())
        .unwrap_err();

    match err {
        EngineError::NoRecipeMatch {
            seen_items,
            known_items,
        } => {
            assert_eq!(seen_items, vec!["Espresso", "Green Tea"]);
            assert_eq!(known_items, vec!["Latte"]);
        }
        other => panic!("期望 NoRecipeMatch,实际 {:?}", other),
    }
}

// ==========================================
// 预测 → 预警
// ==========================================

#[test]
fn test_forecast_to_alert_flow() {
    let (table, schema) = detect_and_resolve(
        b"date,item,quantity\n\
          2025-01-01,Latte,10\n\
          2025-01-02,Latte,10\n",
    );

    let summary = UsageAggregator::new()
        .aggregate(&table, &schema, &latte_mapping())
        .unwrap();

    let mut stock = HashMap::new();
    stock.insert("milk".to_string(), 100.0);
    let forecasts = ForecastEngine::new().forecast(&summary.daily_usage, &stock);

    let sink = RecordingNotifier::new();
    let records = AlertPolicy::new(2.0).evaluate(&forecasts, &sink, "owner@cafe.test");

    // 1.25 天 < 2 天 → 触发预警
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ingredient, "milk");
    assert!(records[0].status.is_sent());
    assert_eq!(sink.sent_ingredients(), vec!["milk".to_string()]);
}

#[test]
fn test_default_stock_does_not_alert() {
    // 库存未提供 → 默认 1000 盎司,80 盎司/天 = 12.5 天,不触发
    let (table, schema) = detect_and_resolve(
        b"date,item,quantity\n\
          2025-01-01,Latte,10\n\
          2025-01-02,Latte,10\n",
    );

    let summary = UsageAggregator::new()
        .aggregate(&table, &schema, &latte_mapping())
        .unwrap();
    let forecasts =
        ForecastEngine::new().forecast(&summary.daily_usage, &HashMap::new());

    assert_eq!(forecasts["milk"].days_remaining, 12.5);

    let sink = RecordingNotifier::new();
    let records = AlertPolicy::new(2.0).evaluate(&forecasts, &sink, "owner@cafe.test");
    assert!(records.is_empty());
}
