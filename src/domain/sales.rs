// ==========================================
// StockWise 库存预测系统 - 销售数据实体
// ==========================================
// 职责: 导入阶段的中间数据结构
// 不变式: RawTable 所有行共享同一列集合
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// RawTable - 原始表格
// ==========================================

/// 格式探测后的原始表格
///
/// 列名在构造时已完成标准化（去空白、去引号、小写），
/// 每行是 列名 → 原始字符串值 的映射。
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// 标准化后的列名（保持文件中的列顺序）
    pub columns: Vec<String>,
    /// 数据行
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 取某行某列的值（列不存在或值缺失返回 None）
    pub fn value(&self, row_idx: usize, column: &str) -> Option<&str> {
        self.rows.get(row_idx).and_then(|r| r.get(column)).map(|s| s.as_str())
    }
}

// ==========================================
// ResolvedSchema - 列识别结果
// ==========================================

/// 列识别结果
///
/// 日期列与品项列为必需项；数量列可选，
/// 缺失时每行按数量 1 计。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSchema {
    pub date_column: String,
    pub item_column: String,
    pub quantity_column: Option<String>,
}

// ==========================================
// SaleEvent - 销售事件
// ==========================================

/// 单条销售事件（由 RawTable 行派生）
///
/// 日期解析失败的行在派生阶段被丢弃，不会生成事件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub date: NaiveDate,
    pub item_name: String,
    /// 数量（非负；缺失或无法解析时为 1）
    pub quantity: f64,
}
