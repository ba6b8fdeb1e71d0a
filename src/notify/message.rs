// ==========================================
// StockWise 库存预测系统 - 预警文案
// ==========================================
// 职责: 预警通知的主题与正文格式化
// 说明: 文案为英文（面向门店经营者的外发通知）
// ==========================================

/// 首字母大写（原料名用于展示）
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// 预警主题行
///
/// 不含特殊字符,保持投递友好。
pub fn format_alert_subject(ingredient: &str, days_remaining: f64) -> String {
    format!(
        "Low Stock Alert - {} - {:.1} days remaining",
        capitalize(ingredient),
        days_remaining
    )
}

/// 预警纯文本正文
pub fn format_alert_body(ingredient: &str, days_remaining: f64, daily_usage: f64) -> String {
    format!(
        "Hello,\n\n\
         This is an automated notification from StockWise.\n\n\
         Inventory Update\n\n\
         Ingredient: {}\n\
         Projected days remaining: approximately {:.1} days\n\
         Average daily usage: {:.2} oz\n\n\
         Please consider restocking soon.\n\n\
         ---\n\
         StockWise Inventory Management System\n",
        capitalize(ingredient),
        days_remaining,
        daily_usage
    )
}
