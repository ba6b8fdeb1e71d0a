// ==========================================
// StockWise 库存预测系统 - 预测结果仓储
// ==========================================
// 职责: 按账户保存预测快照,读取最新一次
// 说明: 每次导入追加一行,get_latest 按 processed_at 取最新
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::forecast::ForecastSet;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// ForecastResultStore Trait
// ==========================================
// 用途: 预测结果存储接口（外部协作方契约）
// 实现者: SqliteForecastRepo
pub trait ForecastResultStore: Send + Sync {
    /// 保存一次预测快照
    fn put(
        &self,
        account_key: &str,
        forecasts: &ForecastSet,
        processed_at: NaiveDateTime,
    ) -> RepositoryResult<()>;

    /// 读取账户最新一次预测快照
    ///
    /// # 返回
    /// - Ok(Some((forecasts, processed_at))): 存在历史快照
    /// - Ok(None): 该账户从未处理过文件
    fn get_latest(
        &self,
        account_key: &str,
    ) -> RepositoryResult<Option<(ForecastSet, NaiveDateTime)>>;
}

// ==========================================
// SqliteForecastRepo 实现
// ==========================================

pub struct SqliteForecastRepo {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteForecastRepo {
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

impl ForecastResultStore for SqliteForecastRepo {
    fn put(
        &self,
        account_key: &str,
        forecasts: &ForecastSet,
        processed_at: NaiveDateTime,
    ) -> RepositoryResult<()> {
        let json = serde_json::to_string(forecasts)?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        // processed_at 经 rusqlite 的 chrono 绑定写入（ISO 8601 文本）,
        // 读取侧同样经绑定还原,两侧格式必然一致
        conn.execute(
            "INSERT INTO forecast_results (result_id, account_key, forecast_json, processed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                Uuid::new_v4().to_string(),
                account_key,
                json,
                processed_at
            ],
        )?;

        tracing::debug!(account_key, ingredients = forecasts.len(), "预测快照已保存");
        Ok(())
    }

    fn get_latest(
        &self,
        account_key: &str,
    ) -> RepositoryResult<Option<(ForecastSet, NaiveDateTime)>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let row: Option<(String, NaiveDateTime)> = conn
            .query_row(
                "SELECT forecast_json, processed_at FROM forecast_results
                 WHERE account_key = ?1
                 ORDER BY processed_at DESC
                 LIMIT 1",
                params![account_key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((json, processed_at)) => {
                let forecasts: ForecastSet = serde_json::from_str(&json)?;
                Ok(Some((forecasts, processed_at)))
            }
            None => Ok(None),
        }
    }
}
