// ==========================================
// StockWise 库存预测系统 - 预警日志仓储
// ==========================================
// 职责: 持久化每次触发的预警记录,支持按账户回查
// 说明: 预警不保证幂等,同一条件可能多次入库
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::alert::{AlertRecord, AlertStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// AlertLogStore Trait
// ==========================================
// 用途: 预警日志存储接口
// 实现者: SqliteAlertLogRepo
pub trait AlertLogStore: Send + Sync {
    /// 批量写入一次评估产生的预警记录
    fn record(&self, account_key: &str, records: &[AlertRecord]) -> RepositoryResult<()>;

    /// 按触发时间倒序读取账户最近的预警记录
    fn list_recent(&self, account_key: &str, limit: usize) -> RepositoryResult<Vec<AlertRecord>>;
}

// ==========================================
// SqliteAlertLogRepo 实现
// ==========================================

pub struct SqliteAlertLogRepo {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAlertLogRepo {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

impl AlertLogStore for SqliteAlertLogRepo {
    fn record(&self, account_key: &str, records: &[AlertRecord]) -> RepositoryResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;
        for record in records {
            let error = match &record.status {
                AlertStatus::Sent => None,
                AlertStatus::Failed { reason } => Some(reason.clone()),
            };
            tx.execute(
                "INSERT INTO alert_log
                     (alert_id, account_key, ingredient, days_remaining, status, error, triggered_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.alert_id,
                    account_key,
                    record.ingredient,
                    record.days_remaining,
                    record.status.as_code(),
                    error,
                    record.triggered_at
                ],
            )?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;

        tracing::debug!(account_key, count = records.len(), "预警记录已入库");
        Ok(())
    }

    fn list_recent(&self, account_key: &str, limit: usize) -> RepositoryResult<Vec<AlertRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let mut stmt = conn.prepare(
            "SELECT alert_id, ingredient, days_remaining, status, error, triggered_at
             FROM alert_log
             WHERE account_key = ?1
             ORDER BY triggered_at DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![account_key, limit as i64], |row| {
            let alert_id: String = row.get(0)?;
            let ingredient: String = row.get(1)?;
            let days_remaining: f64 = row.get(2)?;
            let status_code: String = row.get(3)?;
            let error: Option<String> = row.get(4)?;
            // triggered_at 经 rusqlite 的 chrono 绑定还原,与写入侧格式一致
            let triggered_at: NaiveDateTime = row.get(5)?;
            Ok((
                alert_id,
                ingredient,
                days_remaining,
                status_code,
                error,
                triggered_at,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (alert_id, ingredient, days_remaining, status_code, error, triggered_at) = row?;
            let status = match status_code.as_str() {
                "sent" => AlertStatus::Sent,
                _ => AlertStatus::Failed {
                    reason: error.unwrap_or_default(),
                },
            };
            records.push(AlertRecord {
                alert_id,
                ingredient,
                days_remaining,
                triggered_at,
                status,
            });
        }
        Ok(records)
    }
}
