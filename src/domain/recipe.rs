// ==========================================
// StockWise 库存预测系统 - 配方映射实体
// ==========================================
// 职责: 菜单品项 → 每单位消耗原料(盎司) 的映射
// 匹配规则: 品项名大小写不敏感、忽略首尾空白与引号
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 标准化品项名（匹配键）
///
/// TRIM + 去首尾引号 + 小写。配方保存与销售行查找
/// 使用同一标准化函数，保证两侧一致。
pub fn normalize_item_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_lowercase()
}

// ==========================================
// RecipeMapping - 配方映射
// ==========================================

/// 按账户配置的配方映射
///
/// 外层键为菜单品项名（保留录入时的大小写用于展示），
/// 内层为 原料名 → 每单位消耗盎司数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeMapping {
    entries: BTreeMap<String, BTreeMap<String, f64>>,
}

impl RecipeMapping {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// 内置默认映射（账户未配置映射时的回退值）
    pub fn builtin_default() -> Self {
        let mut mapping = Self::new();
        mapping.insert("Latte", &[("milk", 8.0)]);
        mapping.insert("Cappuccino", &[("milk", 6.0)]);
        mapping.insert("Mocha", &[("milk", 8.0)]);
        mapping
    }

    /// 写入一条品项配方（同名品项覆盖）
    pub fn insert(&mut self, item: &str, ingredients: &[(&str, f64)]) {
        let recipe: BTreeMap<String, f64> = ingredients
            .iter()
            .map(|(name, oz)| (name.to_string(), *oz))
            .collect();
        self.entries.insert(item.trim().to_string(), recipe);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 品项名列表（录入形式，字典序）
    pub fn item_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, f64>)> {
        self.entries.iter()
    }

    /// 构建 标准化品项名 → 配方 的查找表
    ///
    /// 聚合阶段每行都要查找，预构建一次避免逐行线性扫描。
    pub fn lookup_table(&self) -> BTreeMap<String, &BTreeMap<String, f64>> {
        self.entries
            .iter()
            .map(|(key, recipe)| (normalize_item_name(key), recipe))
            .collect()
    }
}

impl Default for RecipeMapping {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_item_name() {
        assert_eq!(normalize_item_name("  Latte  "), "latte");
        assert_eq!(normalize_item_name("\"LATTE\""), "latte");
        assert_eq!(normalize_item_name("'Flat White'"), "flat white");
    }

    #[test]
    fn test_lookup_table_case_insensitive() {
        let mapping = RecipeMapping::builtin_default();
        let lookup = mapping.lookup_table();

        // 查找键与销售行同走 normalize_item_name,任意写法命中同一配方
        assert!(lookup.contains_key(&normalize_item_name("Latte")));
        assert!(lookup.contains_key(&normalize_item_name("LATTE")));
        assert!(lookup.contains_key(&normalize_item_name(" \"latte\" ")));
        assert!(!lookup.contains_key(&normalize_item_name("Espresso")));

        let recipe = lookup[&normalize_item_name("Cappuccino")];
        assert_eq!(recipe.get("milk"), Some(&6.0));
    }

    #[test]
    fn test_serde_round_trip() {
        let mapping = RecipeMapping::builtin_default();
        let json = serde_json::to_string(&mapping).unwrap();
        let back: RecipeMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(mapping, back);
    }
}
