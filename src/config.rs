// ==========================================
// StockWise 库存预测系统 - 应用配置
// ==========================================
// 职责: 环境变量加载 + 默认值
// 说明: 默认配方映射是显式配置项,由此注入聚合引擎,
//       不作为模块级环境状态存在
// ==========================================

use crate::domain::recipe::RecipeMapping;
use crate::engine::alert_policy::DEFAULT_LOW_STOCK_THRESHOLD_DAYS;
use crate::engine::forecast_engine::DEFAULT_STOCK_OZ;
use std::path::PathBuf;

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite 数据库文件路径
    pub db_path: String,
    /// 低库存阈值（天）
    pub low_stock_threshold_days: f64,
    /// 未提供库存时的默认值（盎司）
    pub default_stock_oz: f64,
    /// 测试模式（对所有原料触发预警,仅用于验证预警链路）
    pub test_mode: bool,
    /// 预警发件人
    pub alert_email_from: String,
    /// 账户未配置映射时的回退配方映射
    pub default_mapping: RecipeMapping,
}

impl AppConfig {
    /// 从环境变量加载配置（缺失项使用默认值）
    ///
    /// # 环境变量
    /// - STOCKWISE_DB_PATH: 数据库路径
    /// - LOW_STOCK_THRESHOLD: 低库存阈值（天）
    /// - DEFAULT_STOCK_OZ: 默认库存（盎司）
    /// - TEST_MODE: true 时启用测试模式
    /// - ALERT_EMAIL_FROM: 预警发件人
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            db_path: std::env::var("STOCKWISE_DB_PATH").unwrap_or(defaults.db_path),
            low_stock_threshold_days: env_f64(
                "LOW_STOCK_THRESHOLD",
                defaults.low_stock_threshold_days,
            ),
            default_stock_oz: env_f64("DEFAULT_STOCK_OZ", defaults.default_stock_oz),
            test_mode: std::env::var("TEST_MODE")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            alert_email_from: std::env::var("ALERT_EMAIL_FROM")
                .unwrap_or(defaults.alert_email_from),
            default_mapping: defaults.default_mapping,
        }
    }

    /// 默认数据库路径（平台数据目录,取不到时退到当前目录）
    pub fn default_db_path() -> String {
        dirs::data_dir()
            .map(|dir| dir.join("stockwise").join("stockwise.db"))
            .unwrap_or_else(|| PathBuf::from("stockwise.db"))
            .display()
            .to_string()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: Self::default_db_path(),
            low_stock_threshold_days: DEFAULT_LOW_STOCK_THRESHOLD_DAYS,
            default_stock_oz: DEFAULT_STOCK_OZ,
            test_mode: false,
            alert_email_from: "alerts@stockwise.com".to_string(),
            default_mapping: RecipeMapping::builtin_default(),
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(default)
}
