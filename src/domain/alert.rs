// ==========================================
// StockWise 库存预测系统 - 预警记录实体
// ==========================================
// 职责: 低库存预警的触发记录
// 说明: 不保证幂等，每次运行重新评估，同一条件可重复预警
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// AlertStatus - 发送状态
// ==========================================

/// 预警通知的发送状态
///
/// 单个原料的发送失败只记录在此，不中断批次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertStatus {
    /// 通知已成功交给通知通道
    Sent,
    /// 通知发送失败（保留失败原因）
    Failed { reason: String },
}

impl AlertStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, AlertStatus::Sent)
    }

    /// 持久化用的状态码
    pub fn as_code(&self) -> &'static str {
        match self {
            AlertStatus::Sent => "sent",
            AlertStatus::Failed { .. } => "failed",
        }
    }
}

// ==========================================
// AlertRecord - 预警记录
// ==========================================

/// 单条低库存预警记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub alert_id: String,
    pub ingredient: String,
    pub days_remaining: f64,
    pub triggered_at: NaiveDateTime,
    pub status: AlertStatus,
}

impl AlertRecord {
    pub fn new(
        ingredient: &str,
        days_remaining: f64,
        triggered_at: NaiveDateTime,
        status: AlertStatus,
    ) -> Self {
        Self {
            alert_id: Uuid::new_v4().to_string(),
            ingredient: ingredient.to_string(),
            days_remaining,
            triggered_at,
            status,
        }
    }
}
