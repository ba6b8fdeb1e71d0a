// ==========================================
// StockWise 库存预测系统 - 预测引擎
// ==========================================
// 职责: 每日消耗序列 + 当前库存 → 日均消耗与可用天数
// 算法: 连续日序列补零 + 尾部 7 日滑动均值（不足 7 日取全部）
// ==========================================

use crate::domain::forecast::{DailyUsage, ForecastResult, ForecastSet};
use chrono::Duration;
use std::collections::HashMap;

/// 滑动窗口天数
pub const ROLLING_WINDOW_DAYS: usize = 7;

/// 未提供库存时的默认值（盎司）
pub const DEFAULT_STOCK_OZ: f64 = 1000.0;

/// 四舍五入到 2 位小数
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// ForecastEngine - 预测引擎
// ==========================================

pub struct ForecastEngine {
    default_stock_oz: f64,
}

impl ForecastEngine {
    pub fn new() -> Self {
        Self {
            default_stock_oz: DEFAULT_STOCK_OZ,
        }
    }

    /// 指定默认库存量（测试与配置注入用）
    pub fn with_default_stock(default_stock_oz: f64) -> Self {
        Self { default_stock_oz }
    }

    /// 生成每个原料的预测结果
    ///
    /// # 参数
    /// - usage: 每日消耗累加器
    /// - stock_levels: 调用方提供的当前库存（盎司）。
    ///   键缺失 → 使用默认库存;显式 0 保留为 0
    ///
    /// # 返回
    /// 原料 → ForecastResult（字典序,迭代顺序确定）
    pub fn forecast(
        &self,
        usage: &DailyUsage,
        stock_levels: &HashMap<String, f64>,
    ) -> ForecastSet {
        let mut results = ForecastSet::new();

        for (ingredient, series) in usage.iter() {
            let daily = Self::fill_daily_series(series);
            let daily_avg = Self::trailing_mean(&daily);

            let current_stock_oz = stock_levels
                .get(ingredient)
                .copied()
                .unwrap_or(self.default_stock_oz);

            let days_remaining = if daily_avg > 0.0 {
                round2(current_stock_oz / daily_avg)
            } else {
                f64::INFINITY
            };

            results.insert(
                ingredient.clone(),
                ForecastResult {
                    daily_avg_usage_oz: round2(daily_avg),
                    days_remaining,
                    current_stock_oz,
                },
            );
        }

        tracing::info!(ingredients = results.len(), "预测计算完成");
        results
    }

    /// 展开为连续日序列（观测区间内无销售的日期补 0）
    fn fill_daily_series(series: &std::collections::BTreeMap<chrono::NaiveDate, f64>) -> Vec<f64> {
        let (Some((&first, _)), Some((&last, _))) =
            (series.iter().next(), series.iter().next_back())
        else {
            return Vec::new();
        };

        let mut daily = Vec::new();
        let mut day = first;
        while day <= last {
            daily.push(series.get(&day).copied().unwrap_or(0.0));
            day += Duration::days(1);
        }
        daily
    }

    /// 以最近一日为终点的尾部滑动均值
    ///
    /// 不足 ROLLING_WINDOW_DAYS 天时窗口收窄为现有天数（至少 1），
    /// 不按 7 天摊薄。
    fn trailing_mean(daily: &[f64]) -> f64 {
        if daily.is_empty() {
            return 0.0;
        }
        let window = daily.len().min(ROLLING_WINDOW_DAYS);
        let tail = &daily[daily.len() - window..];
        tail.iter().sum::<f64>() / window as f64
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new()
    }
}
