// ==========================================
// StockWise 库存预测系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout,减少并发写入时的偶发 busy 错误
// - 集中建表语句,保证三个存储表结构一致
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 创建存储表（幂等）
///
/// # 表
/// - ingredient_mappings: 账户配方映射（JSON）,每账户一行,后写覆盖
/// - forecast_results: 预测结果快照（JSON）,按 processed_at 取最新
/// - alert_log: 预警发送记录
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS ingredient_mappings (
            account_key   TEXT PRIMARY KEY,
            mapping_json  TEXT NOT NULL,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS forecast_results (
            result_id     TEXT PRIMARY KEY,
            account_key   TEXT NOT NULL,
            forecast_json TEXT NOT NULL,
            processed_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_forecast_results_account
            ON forecast_results (account_key, processed_at);

        CREATE TABLE IF NOT EXISTS alert_log (
            alert_id       TEXT PRIMARY KEY,
            account_key    TEXT NOT NULL,
            ingredient     TEXT NOT NULL,
            days_remaining REAL NOT NULL,
            status         TEXT NOT NULL,
            error          TEXT,
            triggered_at   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_alert_log_account
            ON alert_log (account_key, triggered_at);
        ",
    )
}
