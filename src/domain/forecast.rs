// ==========================================
// StockWise 库存预测系统 - 消耗与预测实体
// ==========================================
// 职责: 每日消耗累加器与预测结果
// 不变式: days_remaining 仅在日均消耗为 0 时为 +∞
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// DailyUsage - 每日原料消耗
// ==========================================

/// (原料, 日期) → 累计消耗盎司数
///
/// 使用 BTreeMap 保证原料与日期的迭代顺序确定，
/// 预测输出与测试断言均可复现。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyUsage {
    usage: BTreeMap<String, BTreeMap<NaiveDate, f64>>,
}

impl DailyUsage {
    pub fn new() -> Self {
        Self {
            usage: BTreeMap::new(),
        }
    }

    /// 累加一次消耗
    pub fn add(&mut self, ingredient: &str, date: NaiveDate, oz: f64) {
        *self
            .usage
            .entry(ingredient.to_string())
            .or_default()
            .entry(date)
            .or_insert(0.0) += oz;
    }

    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }

    /// 原料名列表（字典序）
    pub fn ingredients(&self) -> Vec<String> {
        self.usage.keys().cloned().collect()
    }

    /// 某原料的按日消耗序列（仅包含有销售的日期）
    pub fn series(&self, ingredient: &str) -> Option<&BTreeMap<NaiveDate, f64>> {
        self.usage.get(ingredient)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<NaiveDate, f64>)> {
        self.usage.iter()
    }
}

// ==========================================
// UsageSummary - 聚合结果
// ==========================================

/// 聚合阶段的完整输出
///
/// 除消耗累加器外，还携带文件中出现的全部品项名
/// 与命中配方的品项名，用于命名不匹配时的诊断。
#[derive(Debug, Clone)]
pub struct UsageSummary {
    pub daily_usage: DailyUsage,
    /// 文件中出现的全部品项（去重，展示形式）
    pub all_items: BTreeSet<String>,
    /// 命中配方映射的品项（all_items 的子集）
    pub matched_items: BTreeSet<String>,
}

impl UsageSummary {
    /// 未命中配方的品项（字典序）
    pub fn unmatched_items(&self) -> Vec<String> {
        self.all_items
            .difference(&self.matched_items)
            .cloned()
            .collect()
    }
}

// ==========================================
// ForecastResult - 预测结果
// ==========================================

/// 单个原料的预测结果
///
/// 数值均四舍五入到 2 位小数。days_remaining 在日均
/// 消耗为 0 时为 +∞，JSON 中以 null 表示。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub daily_avg_usage_oz: f64,
    #[serde(with = "days_remaining_serde")]
    pub days_remaining: f64,
    pub current_stock_oz: f64,
}

/// 原料 → 预测结果（字典序，迭代顺序确定）
pub type ForecastSet = BTreeMap<String, ForecastResult>;

/// days_remaining 的 JSON 表示
///
/// JSON 数值不支持无穷大：+∞ 序列化为 null，
/// 反序列化时 null 还原为 +∞。
mod days_remaining_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<f64>::deserialize(deserializer)?;
        Ok(opt.unwrap_or(f64::INFINITY))
    }
}
