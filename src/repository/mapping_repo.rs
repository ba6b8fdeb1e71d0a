// ==========================================
// StockWise 库存预测系统 - 配方映射仓储
// ==========================================
// 职责: 按账户保存/读取配方映射
// 语义: get 未命中返回 None（调用方回退默认映射,不是错误）
//       put 为后写覆盖（last-writer-wins）,按连接锁串行化
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::recipe::RecipeMapping;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// MappingStore Trait
// ==========================================
// 用途: 映射存储接口（外部协作方契约）
// 实现者: SqliteMappingRepo
pub trait MappingStore: Send + Sync {
    /// 读取账户的配方映射
    ///
    /// # 返回
    /// - Ok(Some(mapping)): 账户已配置映射
    /// - Ok(None): 账户未配置（调用方应回退默认映射）
    fn get(&self, account_key: &str) -> RepositoryResult<Option<RecipeMapping>>;

    /// 保存账户的配方映射（覆盖旧值,刷新 updated_at）
    fn put(&self, account_key: &str, mapping: &RecipeMapping) -> RepositoryResult<()>;
}

// ==========================================
// SqliteMappingRepo 实现
// ==========================================

pub struct SqliteMappingRepo {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMappingRepo {
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

impl MappingStore for SqliteMappingRepo {
    fn get(&self, account_key: &str) -> RepositoryResult<Option<RecipeMapping>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let json: Option<String> = conn
            .query_row(
                "SELECT mapping_json FROM ingredient_mappings WHERE account_key = ?1",
                params![account_key],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn put(&self, account_key: &str, mapping: &RecipeMapping) -> RepositoryResult<()> {
        let json = serde_json::to_string(mapping)?;
        let now = Utc::now().naive_utc().to_string();

        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT INTO ingredient_mappings (account_key, mapping_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(account_key) DO UPDATE SET
                 mapping_json = excluded.mapping_json,
                 updated_at = excluded.updated_at",
            params![account_key, json, now],
        )?;

        tracing::debug!(account_key, items = mapping.len(), "配方映射已保存");
        Ok(())
    }
}
