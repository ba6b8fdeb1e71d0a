// ==========================================
// StockWise 库存预测系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 没有任何销售行命中配方映射
    ///
    /// 同时携带文件中观察到的品项与映射中已知的品项，
    /// 便于定位是文件问题还是映射问题。
    #[error(
        "没有匹配到任何菜单品项。\n文件中的品项: {}\n映射中的品项: {}\n请确认文件品项与配方映射使用相同的名称",
        format_items(seen_items),
        format_items(known_items)
    )]
    NoRecipeMatch {
        seen_items: Vec<String>,
        known_items: Vec<String>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 诊断用品项列表格式化（空列表显示为 "无"）
fn format_items(items: &[String]) -> String {
    if items.is_empty() {
        "无".to_string()
    } else {
        items.join(", ")
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_recipe_match_lists_both_sides() {
        let err = EngineError::NoRecipeMatch {
            seen_items: vec!["Espresso".to_string(), "Tea".to_string()],
            known_items: vec!["Latte".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("Espresso, Tea"));
        assert!(message.contains("Latte"));
    }

    #[test]
    fn test_no_recipe_match_empty_seen() {
        let err = EngineError::NoRecipeMatch {
            seen_items: vec![],
            known_items: vec!["Latte".to_string()],
        };
        assert!(err.to_string().contains("无"));
    }
}
