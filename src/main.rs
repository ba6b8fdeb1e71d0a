// ==========================================
// StockWise 库存预测系统 - 命令行入口
// ==========================================
// 技术栈: Rust + SQLite
// 用法: stockwise <销售导出.csv> <账户键> [原料=库存盎司 ...]
// ==========================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use stockwise::config::AppConfig;
use stockwise::db::{init_schema, open_sqlite_connection};
use stockwise::engine::ForecastPipeline;
use stockwise::notify::ConsoleNotifier;
use stockwise::repository::{SqliteAlertLogRepo, SqliteForecastRepo, SqliteMappingRepo};
use stockwise::{logging, APP_NAME, VERSION};

fn main() -> ExitCode {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", APP_NAME);
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("用法: stockwise <销售导出.csv> <账户键> [原料=库存盎司 ...]");
        eprintln!("示例: stockwise sales.csv owner@cafe.test milk=100 \"espresso beans=48\"");
        return ExitCode::FAILURE;
    }
    let file_path = PathBuf::from(&args[0]);
    let account_key = args[1].clone();

    let stock_levels = match parse_stock_args(&args[2..]) {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("库存参数无效: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = AppConfig::from_env();
    tracing::info!("使用数据库: {}", config.db_path);

    match run(&config, &file_path, &account_key, &stock_levels) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("处理失败: {}", e);
            eprintln!("处理失败: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(
    config: &AppConfig,
    file_path: &Path,
    account_key: &str,
    stock_levels: &HashMap<String, f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    // 数据库初始化（建表幂等）
    if let Some(parent) = Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = open_sqlite_connection(&config.db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    // 组装管线（三个仓储共享同一条连接）
    let pipeline = ForecastPipeline::new(
        config,
        Arc::new(SqliteMappingRepo::from_connection(Arc::clone(&conn))),
        Arc::new(SqliteForecastRepo::from_connection(Arc::clone(&conn))),
        Arc::new(SqliteAlertLogRepo::from_connection(Arc::clone(&conn))),
        Arc::new(ConsoleNotifier::new()),
    );

    let outcome = pipeline.run(file_path, account_key, stock_levels)?;

    println!();
    println!("账户: {}", outcome.account_key);
    println!(
        "识别列: 日期={} 品项={} 数量={}",
        outcome.schema.date_column,
        outcome.schema.item_column,
        outcome.schema.quantity_column.as_deref().unwrap_or("(无)")
    );
    println!();
    println!("{:<20} {:>12} {:>12} {:>10}", "原料", "日均(盎司)", "库存(盎司)", "可用天数");
    for (ingredient, forecast) in &outcome.forecasts {
        let days = if forecast.days_remaining.is_infinite() {
            "∞".to_string()
        } else {
            format!("{:.2}", forecast.days_remaining)
        };
        println!(
            "{:<20} {:>12.2} {:>12.2} {:>10}",
            ingredient, forecast.daily_avg_usage_oz, forecast.current_stock_oz, days
        );
    }

    if !outcome.unmatched_items.is_empty() {
        println!();
        println!("未匹配配方的品项: {}", outcome.unmatched_items.join(", "));
    }

    println!();
    if outcome.alerts.is_empty() {
        println!("无低库存预警");
    } else {
        println!("低库存预警 ({} 条):", outcome.alerts.len());
        for alert in &outcome.alerts {
            println!(
                "  - {} (剩余 {:.1} 天, 状态: {})",
                alert.ingredient,
                alert.days_remaining,
                alert.status.as_code()
            );
        }
    }

    Ok(())
}

/// 解析 `原料=库存盎司` 形式的命令行参数
fn parse_stock_args(args: &[String]) -> Result<HashMap<String, f64>, String> {
    let mut levels = HashMap::new();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("缺少 '=': {}", arg))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("原料名为空: {}", arg));
        }
        let oz = value
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("库存数值无效: {}", arg))?;
        if !oz.is_finite() || oz < 0.0 {
            return Err(format!("库存必须为非负数: {}", arg));
        }
        levels.insert(name.to_string(), oz);
    }
    Ok(levels)
}
