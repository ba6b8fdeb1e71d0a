// ==========================================
// StockWise 库存预测系统 - 列识别器
// ==========================================
// 职责: 从标准化列名中识别 日期/品项/数量 三个角色
// 算法: 优先关键词 → 关键词组 → 位置回退,全程确定性
// 顺序: 先日期,后品项,最后数量;并列取最左列
// ==========================================

use crate::domain::sales::{RawTable, ResolvedSchema};
use crate::importer::data_cleaner::SalesDataCleaner;
use crate::importer::error::{ImportError, ImportResult};

/// 日期回退探测的采样行数
const DATE_PROBE_ROWS: usize = 5;

// ==========================================
// RolePattern - 角色关键词表
// ==========================================

/// 单个角色的关键词匹配表
///
/// priority 按序优先匹配（子串匹配，首个命中即止），
/// 其后逐组回退到 groups。
pub struct RolePattern {
    pub priority: &'static [&'static str],
    pub groups: &'static [&'static [&'static str]],
}

/// 日期列关键词
pub const DATE_PATTERN: RolePattern = RolePattern {
    priority: &["date", "time", "timestamp"],
    groups: &[
        &["date", "time", "timestamp", "created", "sold", "order"],
        &["day", "when", "dt"],
    ],
};

/// 品项列关键词
pub const ITEM_PATTERN: RolePattern = RolePattern {
    priority: &["item", "product", "name"],
    groups: &[
        &["item", "product", "name", "menu", "sku"],
        &["description", "title", "product_name", "item_name"],
    ],
};

/// 数量列关键词
pub const QUANTITY_PATTERN: RolePattern = RolePattern {
    priority: &["quantity", "qty", "amount"],
    groups: &[
        &["quantity", "qty", "amount", "count", "units"],
        &["qty", "num", "number"],
    ],
};

/// 按关键词表查找列（纯函数）
///
/// # 参数
/// - columns: 标准化（小写）后的列名，保持文件列顺序
/// - pattern: 角色关键词表
///
/// # 返回
/// - Some(idx): 首个命中的列下标（优先关键词先于关键词组；同一关键词取最左列）
/// - None: 无命中
pub fn find_column(columns: &[String], pattern: &RolePattern) -> Option<usize> {
    for keyword in pattern.priority {
        for (idx, column) in columns.iter().enumerate() {
            if column.contains(keyword) {
                return Some(idx);
            }
        }
    }

    for group in pattern.groups {
        for keyword in *group {
            for (idx, column) in columns.iter().enumerate() {
                if column.contains(keyword) {
                    return Some(idx);
                }
            }
        }
    }

    None
}

// ==========================================
// ColumnResolver - 列识别器
// ==========================================

pub struct ColumnResolver {
    cleaner: SalesDataCleaner,
}

impl ColumnResolver {
    pub fn new() -> Self {
        Self {
            cleaner: SalesDataCleaner,
        }
    }

    /// 识别表格的日期/品项/数量列
    ///
    /// # 返回
    /// - Ok(ResolvedSchema): 日期列与品项列识别成功（数量列可为 None）
    /// - Err(SchemaUnresolved): 日期列或品项列无法识别，诊断中列出现有列名
    pub fn resolve(&self, table: &RawTable) -> ImportResult<ResolvedSchema> {
        let columns = &table.columns;

        // 1. 关键词匹配
        let mut date_idx = find_column(columns, &DATE_PATTERN);
        let mut item_idx = find_column(columns, &ITEM_PATTERN);
        let quantity_idx = find_column(columns, &QUANTITY_PATTERN);

        // 2. 日期位置回退: 第一列的前几个值能解析为日期则采用
        if date_idx.is_none() && !columns.is_empty() {
            let first_column = &columns[0];
            let parses_as_date = table
                .rows
                .iter()
                .take(DATE_PROBE_ROWS)
                .filter_map(|row| row.get(first_column))
                .any(|v| self.cleaner.parse_date_flexible(v).is_some());
            if parses_as_date {
                date_idx = Some(0);
            }
        }

        // 3. 品项位置回退: 日期占第一列时取第二列,否则取首个非日期列
        if item_idx.is_none() && columns.len() > 1 {
            item_idx = match date_idx {
                Some(0) => Some(1),
                Some(d) => (0..columns.len()).find(|&i| i != d),
                None => Some(0),
            };
        }

        match (date_idx, item_idx) {
            (Some(d), Some(i)) => {
                let schema = ResolvedSchema {
                    date_column: columns[d].clone(),
                    item_column: columns[i].clone(),
                    quantity_column: quantity_idx.map(|q| columns[q].clone()),
                };
                tracing::info!(
                    date = %schema.date_column,
                    item = %schema.item_column,
                    quantity = schema.quantity_column.as_deref().unwrap_or("无(按每行 1 计)"),
                    "列识别完成"
                );
                Ok(schema)
            }
            _ => Err(ImportError::SchemaUnresolved {
                columns: columns.join(", "),
            }),
        }
    }
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn table_of(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        let mut table = RawTable::new(cols(columns));
        for row_values in rows {
            let mut row = HashMap::new();
            for (idx, value) in row_values.iter().enumerate() {
                row.insert(columns[idx].to_string(), value.to_string());
            }
            table.rows.push(row);
        }
        table
    }

    #[test]
    fn test_find_column_priority_wins() {
        // "created" 在组中,"date" 在优先表中 → 优先表先命中
        let columns = cols(&["created_at", "order date", "item"]);
        assert_eq!(find_column(&columns, &DATE_PATTERN), Some(1));
    }

    #[test]
    fn test_find_column_leftmost_on_tie() {
        let columns = cols(&["start date", "end date"]);
        assert_eq!(find_column(&columns, &DATE_PATTERN), Some(0));
    }

    #[test]
    fn test_find_column_falls_back_to_groups() {
        let columns = cols(&["day", "item"]);
        assert_eq!(find_column(&columns, &DATE_PATTERN), Some(0));
        assert_eq!(find_column(&columns, &QUANTITY_PATTERN), None);
    }

    #[test]
    fn test_resolve_by_keywords() {
        let table = table_of(
            &["date", "item name", "quantity sold"],
            &[&["2025-01-01", "Latte", "2"]],
        );
        let schema = ColumnResolver::new().resolve(&table).unwrap();
        assert_eq!(schema.date_column, "date");
        assert_eq!(schema.item_column, "item name");
        assert_eq!(schema.quantity_column, Some("quantity sold".to_string()));
    }

    #[test]
    fn test_resolve_date_fallback_first_column_values() {
        // 列名没有日期关键词,但第一列的值是日期
        let table = table_of(&["col_a", "item"], &[&["2025-01-01", "Latte"]]);
        let schema = ColumnResolver::new().resolve(&table).unwrap();
        assert_eq!(schema.date_column, "col_a");
        assert_eq!(schema.item_column, "item");
    }

    #[test]
    fn test_resolve_item_fallback_second_column() {
        // 品项列名无关键词 → 日期占第一列时取第二列
        let table = table_of(&["date", "col_b"], &[&["2025-01-01", "Latte"]]);
        let schema = ColumnResolver::new().resolve(&table).unwrap();
        assert_eq!(schema.item_column, "col_b");
        assert_eq!(schema.quantity_column, None);
    }

    #[test]
    fn test_resolve_fails_listing_columns() {
        let table = table_of(&["alpha", "beta"], &[&["x", "y"]]);
        let err = ColumnResolver::new().resolve(&table).unwrap_err();
        match err {
            ImportError::SchemaUnresolved { columns } => {
                assert!(columns.contains("alpha"));
                assert!(columns.contains("beta"));
            }
            other => panic!("期望 SchemaUnresolved,实际 {:?}", other),
        }
    }
}
