// ==========================================
// StockWise 库存预测系统 - 销售数据清洗器
// ==========================================
// 职责: TRIM / 引号剥离 / 数量与日期强制转换
// 说明: POS 导出的日期格式五花八门，按固定格式表逐一尝试
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 纯日期格式（按常见程度排序；月份在前优先于日期在前）
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%Y",
    "%Y%m%d",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// 含时间的格式（解析后取日期部分）
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

pub struct SalesDataCleaner;

impl SalesDataCleaner {
    /// 清洗文本字段（TRIM + 去首尾引号）
    pub fn clean_text(&self, value: &str) -> String {
        value
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .trim()
            .to_string()
    }

    /// 强制转换数量字段
    ///
    /// # 规则
    /// - 缺失 / 空白 / 无法解析 → 默认 1
    /// - 负值截断为 0（数量不变式: quantity ≥ 0）
    pub fn parse_quantity(&self, value: Option<&str>) -> f64 {
        match value {
            None => 1.0,
            Some(raw) => {
                let cleaned = self.clean_text(raw);
                if cleaned.is_empty() {
                    return 1.0;
                }
                match cleaned.parse::<f64>() {
                    Ok(qty) if qty.is_finite() => qty.max(0.0),
                    _ => 1.0,
                }
            }
        }
    }

    /// 宽松日期解析
    ///
    /// 依次尝试: RFC 3339 → 纯日期格式表 → 日期时间格式表。
    /// 全部失败返回 None，调用方应丢弃该行。
    pub fn parse_date_flexible(&self, value: &str) -> Option<NaiveDate> {
        let cleaned = self.clean_text(value);
        if cleaned.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(&cleaned) {
            return Some(dt.date_naive());
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
                return Some(date);
            }
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, format) {
                return Some(dt.date());
            }
        }

        None
    }
}
