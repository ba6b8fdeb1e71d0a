// ==========================================
// StockWise 库存预测系统 - 通知层
// ==========================================
// 职责: 低库存预警的通知通道接口
// 说明: 邮件等实际投递通道属于外部协作方;
//       核心只依赖 NotificationSink 接口,失败不越过 AlertPolicy 边界
// ==========================================

use thiserror::Error;

// 模块声明
pub mod console;
pub mod message;

// 重导出核心类型
pub use console::ConsoleNotifier;
pub use message::{format_alert_body, format_alert_subject};

/// 通知层错误类型
///
/// 按原料粒度产生,由 AlertPolicy 捕获并记录,
/// 永不中止批次。
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("通知发送失败: {0}")]
    SendFailed(String),
}

/// Result 类型别名
pub type NotificationResult<T> = Result<T, NotificationError>;

// ==========================================
// NotificationSink Trait
// ==========================================
// 用途: 预警通知接口（外部协作方契约）
// 实现者: ConsoleNotifier;测试中的记录型 Sink
pub trait NotificationSink: Send + Sync {
    /// 发送一条低库存预警
    ///
    /// # 参数
    /// - to: 接收方（账户键,通常为邮箱）
    /// - ingredient: 原料名
    /// - days_remaining: 预计可用天数
    /// - daily_usage: 日均消耗（盎司）
    ///
    /// # 语义
    /// 至少一次、即发即弃;核心不内置重试。
    fn send(
        &self,
        to: &str,
        ingredient: &str,
        days_remaining: f64,
        daily_usage: f64,
    ) -> NotificationResult<()>;
}
