// ==========================================
// StockWise 库存预测系统 - 预警策略引擎
// ==========================================
// 职责: 预测结果 × 阈值 → 低库存预警
// 规则: days_remaining < threshold 严格小于;等于不触发
// 隔离: 单个原料的通知失败不影响其余原料
// ==========================================

use crate::domain::alert::{AlertRecord, AlertStatus};
use crate::domain::forecast::ForecastSet;
use crate::notify::NotificationSink;
use chrono::Utc;

/// 默认低库存阈值（天）
pub const DEFAULT_LOW_STOCK_THRESHOLD_DAYS: f64 = 2.0;

/// 测试模式下的放宽阈值（实际效果: 对所有原料触发预警）
pub const TEST_MODE_THRESHOLD_DAYS: f64 = 999.0;

// ==========================================
// AlertPolicy - 预警策略引擎
// ==========================================

pub struct AlertPolicy {
    threshold_days: f64,
    test_mode: bool,
}

impl AlertPolicy {
    pub fn new(threshold_days: f64) -> Self {
        Self {
            threshold_days,
            test_mode: false,
        }
    }

    /// 启用测试模式（用于端到端验证预警链路）
    pub fn with_test_mode(threshold_days: f64, test_mode: bool) -> Self {
        Self {
            threshold_days,
            test_mode,
        }
    }

    /// 本次评估实际使用的阈值
    pub fn effective_threshold(&self) -> f64 {
        if self.test_mode {
            TEST_MODE_THRESHOLD_DAYS
        } else {
            self.threshold_days
        }
    }

    /// 评估预测结果并发送预警
    ///
    /// # 参数
    /// - forecasts: 预测结果（字典序迭代,评估顺序确定）
    /// - sink: 通知通道
    /// - to: 接收方（账户键）
    ///
    /// # 返回
    /// 触发的预警记录列表;每条记录的 status 反映该原料的发送结果。
    /// 通知失败只记录,不中止批次,也不影响预测结果的返回。
    pub fn evaluate(
        &self,
        forecasts: &ForecastSet,
        sink: &dyn NotificationSink,
        to: &str,
    ) -> Vec<AlertRecord> {
        let threshold = self.effective_threshold();
        if self.test_mode {
            tracing::warn!("测试模式已启用,对所有原料触发预警");
        }

        let mut records = Vec::new();

        for (ingredient, forecast) in forecasts {
            // 严格小于;边界相等不触发
            if forecast.days_remaining >= threshold {
                continue;
            }

            let status = match sink.send(
                to,
                ingredient,
                forecast.days_remaining,
                forecast.daily_avg_usage_oz,
            ) {
                Ok(()) => AlertStatus::Sent,
                Err(e) => {
                    tracing::warn!(ingredient, error = %e, "预警通知发送失败,继续处理其余原料");
                    AlertStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            records.push(AlertRecord::new(
                ingredient,
                forecast.days_remaining,
                Utc::now().naive_utc(),
                status,
            ));
        }

        tracing::info!(
            triggered = records.len(),
            sent = records.iter().filter(|r| r.status.is_sent()).count(),
            threshold,
            "预警评估完成"
        );
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::ForecastResult;
    use crate::notify::{NotificationError, NotificationResult};
    use std::sync::Mutex;

    /// 记录型通知通道,可按原料名注入失败
    struct RecordingSink {
        sent: Mutex<Vec<String>>,
        fail_for: Option<String>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: None,
            }
        }

        fn failing_for(ingredient: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: Some(ingredient.to_string()),
            }
        }
    }

    impl NotificationSink for RecordingSink {
        fn send(
            &self,
            _to: &str,
            ingredient: &str,
            _days_remaining: f64,
            _daily_usage: f64,
        ) -> NotificationResult<()> {
            if self.fail_for.as_deref() == Some(ingredient) {
                return Err(NotificationError::SendFailed("smtp timeout".to_string()));
            }
            self.sent.lock().unwrap().push(ingredient.to_string());
            Ok(())
        }
    }

    fn forecast_of(entries: &[(&str, f64)]) -> ForecastSet {
        entries
            .iter()
            .map(|(ingredient, days)| {
                (
                    ingredient.to_string(),
                    ForecastResult {
                        daily_avg_usage_oz: 10.0,
                        days_remaining: *days,
                        current_stock_oz: 100.0,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_strict_threshold_boundary() {
        let policy = AlertPolicy::new(2.0);
        let sink = RecordingSink::new();

        // 等于阈值不触发
        let records = policy.evaluate(&forecast_of(&[("milk", 2.0)]), &sink, "a@b.test");
        assert!(records.is_empty());

        // 略低于阈值触发
        let records = policy.evaluate(&forecast_of(&[("milk", 1.999)]), &sink, "a@b.test");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ingredient, "milk");
        assert!(records[0].status.is_sent());
    }

    #[test]
    fn test_infinite_days_never_triggers() {
        let policy = AlertPolicy::new(2.0);
        let sink = RecordingSink::new();
        let records = policy.evaluate(
            &forecast_of(&[("milk", f64::INFINITY)]),
            &sink,
            "a@b.test",
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_test_mode_widens_threshold() {
        let policy = AlertPolicy::with_test_mode(2.0, true);
        let sink = RecordingSink::new();
        let records = policy.evaluate(&forecast_of(&[("milk", 500.0)]), &sink, "a@b.test");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_failure_isolation() {
        let policy = AlertPolicy::new(2.0);
        let sink = RecordingSink::failing_for("beans");
        let records = policy.evaluate(
            &forecast_of(&[("beans", 1.0), ("milk", 1.5), ("syrup", 0.5)]),
            &sink,
            "a@b.test",
        );

        // 三个原料全部评估;beans 失败不阻断 milk/syrup
        assert_eq!(records.len(), 3);
        let beans = records.iter().find(|r| r.ingredient == "beans").unwrap();
        assert!(matches!(beans.status, AlertStatus::Failed { .. }));
        assert_eq!(
            *sink.sent.lock().unwrap(),
            vec!["milk".to_string(), "syrup".to_string()]
        );
    }

    #[test]
    fn test_evaluation_order_is_sorted() {
        let policy = AlertPolicy::new(2.0);
        let sink = RecordingSink::new();
        policy.evaluate(
            &forecast_of(&[("syrup", 1.0), ("beans", 1.0), ("milk", 1.0)]),
            &sink,
            "a@b.test",
        );
        // ForecastSet 为 BTreeMap → 按原料名字典序评估
        assert_eq!(
            *sink.sent.lock().unwrap(),
            vec![
                "beans".to_string(),
                "milk".to_string(),
                "syrup".to_string()
            ]
        );
    }
}
