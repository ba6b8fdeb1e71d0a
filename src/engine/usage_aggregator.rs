// ==========================================
// StockWise 库存预测系统 - 消耗聚合引擎
// ==========================================
// 职责: 销售行 × 配方映射 → 每日原料消耗
// 输入: RawTable + ResolvedSchema + RecipeMapping
// 输出: UsageSummary (DailyUsage + 品项诊断集合)
// ==========================================

use crate::domain::forecast::{DailyUsage, UsageSummary};
use crate::domain::recipe::{normalize_item_name, RecipeMapping};
use crate::domain::sales::{RawTable, ResolvedSchema, SaleEvent};
use crate::engine::error::{EngineError, EngineResult};
use crate::importer::data_cleaner::SalesDataCleaner;
use std::collections::BTreeSet;

// ==========================================
// UsageAggregator - 消耗聚合引擎
// ==========================================

pub struct UsageAggregator {
    cleaner: SalesDataCleaner,
}

impl UsageAggregator {
    pub fn new() -> Self {
        Self {
            cleaner: SalesDataCleaner,
        }
    }

    /// 从表格行派生销售事件
    ///
    /// # 规则（逐行）
    /// - 品项名: TRIM + 去引号;清洗后为空的行丢弃
    /// - 数量: 缺失/无法解析 → 1,负值截断为 0
    /// - 日期: 宽松解析,失败则整行丢弃
    /// - 行序保持文件顺序,不去重
    ///
    /// # 返回
    /// (销售事件列表, 文件中出现的全部品项名)
    pub fn extract_events(
        &self,
        table: &RawTable,
        schema: &ResolvedSchema,
    ) -> (Vec<SaleEvent>, BTreeSet<String>) {
        let mut events = Vec::new();
        let mut all_items = BTreeSet::new();
        let mut dropped_rows = 0usize;

        for row in &table.rows {
            let item_name = row
                .get(&schema.item_column)
                .map(|v| self.cleaner.clean_text(v))
                .unwrap_or_default();
            if item_name.is_empty() {
                continue;
            }
            all_items.insert(item_name.clone());

            let quantity = self.cleaner.parse_quantity(
                schema
                    .quantity_column
                    .as_ref()
                    .and_then(|col| row.get(col))
                    .map(|s| s.as_str()),
            );

            let date = match row
                .get(&schema.date_column)
                .and_then(|v| self.cleaner.parse_date_flexible(v))
            {
                Some(date) => date,
                None => {
                    dropped_rows += 1;
                    continue;
                }
            };

            events.push(SaleEvent {
                date,
                item_name,
                quantity,
            });
        }

        if dropped_rows > 0 {
            tracing::warn!(dropped_rows, "日期无法解析的行已丢弃");
        }

        (events, all_items)
    }

    /// 聚合每日原料消耗
    ///
    /// # 返回
    /// - Ok(UsageSummary): 消耗累加器 + 品项诊断集合
    /// - Err(NoRecipeMatch): 没有任何行命中配方,携带两侧品项清单
    pub fn aggregate(
        &self,
        table: &RawTable,
        schema: &ResolvedSchema,
        mapping: &RecipeMapping,
    ) -> EngineResult<UsageSummary> {
        let (events, all_items) = self.extract_events(table, schema);
        let lookup = mapping.lookup_table();

        let mut daily_usage = DailyUsage::new();
        let mut matched_items = BTreeSet::new();

        for event in &events {
            let Some(recipe) = lookup.get(&normalize_item_name(&event.item_name)) else {
                continue;
            };
            matched_items.insert(event.item_name.clone());

            for (ingredient, amount_per_unit) in recipe.iter() {
                daily_usage.add(ingredient, event.date, amount_per_unit * event.quantity);
            }
        }

        if daily_usage.is_empty() {
            return Err(EngineError::NoRecipeMatch {
                seen_items: all_items.into_iter().collect(),
                known_items: mapping.item_names(),
            });
        }

        tracing::info!(
            matched = matched_items.len(),
            observed = all_items.len(),
            ingredients = daily_usage.ingredients().len(),
            "消耗聚合完成"
        );

        Ok(UsageSummary {
            daily_usage,
            all_items,
            matched_items,
        })
    }
}

impl Default for UsageAggregator {
    fn default() -> Self {
        Self::new()
    }
}
