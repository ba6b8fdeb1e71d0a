// ==========================================
// StockWise 库存预测系统 - 控制台通知通道
// ==========================================
// 职责: 未配置外部通知通道时的兜底实现
// 行为: 格式化预警并写入日志,始终视为发送成功
// ==========================================

use crate::notify::message::{format_alert_body, format_alert_subject};
use crate::notify::{NotificationResult, NotificationSink};

pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for ConsoleNotifier {
    fn send(
        &self,
        to: &str,
        ingredient: &str,
        days_remaining: f64,
        daily_usage: f64,
    ) -> NotificationResult<()> {
        let subject = format_alert_subject(ingredient, days_remaining);
        let body = format_alert_body(ingredient, days_remaining, daily_usage);

        tracing::info!(
            to,
            subject = %subject,
            "低库存预警（控制台输出,未配置外部通知通道）\n{}",
            body
        );
        Ok(())
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_notifier_always_succeeds() {
        let notifier = ConsoleNotifier::new();
        assert!(notifier.send("owner@cafe.test", "milk", 1.5, 80.0).is_ok());
    }
}
