use crate::db::{EngineError, EngineErrorKind, HistoryTable};
use crate::migration::MigrationIdentifier;

use super::DbEngine;
use sqlx::{PgPool, Postgres, Transaction};
use std::ops::DerefMut;


pub struct PostgresEngine {
    conn_str: String,
    table: HistoryTable,
    pool: Option<PgPool>,
    tx: Option<Transaction<'static, Postgres>>,
}


impl PostgresEngine {
    pub fn new(conn_str: &str, table: HistoryTable) -> Self {
        PostgresEngine { conn_str: conn_str.to_string(), table, pool: None, tx: None }
    }

    async fn pool(&mut self) -> Result<PgPool, EngineError> {
        if let Some(pool) = &self.pool {
            return Ok(pool.clone());
        }

        tracing::debug!("Connecting to database...");
        let pool = PgPool::connect(&self.conn_str).await?;
        self.pool = Some(pool.clone());

        Ok(pool)
    }

    async fn transaction(&mut self) -> Result<&mut Transaction<'static, Postgres>, EngineError> {
        if self.tx.is_none() {
            let txn = self.pool().await?.begin().await?;
            self.tx = Some(txn);
        }

        self.tx.as_mut().ok_or_else(|| EngineError {
            kind: EngineErrorKind::TransactionNotStarted,
        })
    }
}


impl DbEngine for PostgresEngine {
    async fn ensure_table(&mut self) -> Result<(), EngineError> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                "timestamp" BIGINT PRIMARY KEY
            );
            "#,
            self.table
        );
        let pool = self.pool().await?;

        sqlx::query(&sql)
            .execute(&pool)
            .await?;

        Ok(())
    }

    async fn begin(&mut self) -> Result<(), EngineError> {
        self.transaction().await?;

        Ok(())
    }

    async fn fetch_applied(&mut self, limit: usize) -> Result<Vec<MigrationIdentifier>, EngineError> {
        let sql = format!(
            r#"SELECT "timestamp" FROM {} ORDER BY "timestamp" DESC LIMIT $1"#,
            self.table
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let tx = self.transaction().await?;

        let rows: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(limit)
            .fetch_all(tx.deref_mut())
            .await?;

        Ok(rows.into_iter().map(MigrationIdentifier::from).collect())
    }

    async fn execute(&mut self, sql: &str) -> Result<(), EngineError> {
        let tx = self.transaction().await?;

        sqlx::raw_sql(sql)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    async fn insert_record(&mut self, identifier: MigrationIdentifier) -> Result<(), EngineError> {
        // Files sharing an identifier map to one history row
        let sql = format!(
            r#"INSERT INTO {} ("timestamp") VALUES ($1) ON CONFLICT ("timestamp") DO NOTHING"#,
            self.table
        );
        let tx = self.transaction().await?;

        sqlx::query(&sql)
            .bind(identifier.as_i64())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    async fn delete_record(&mut self, identifier: MigrationIdentifier) -> Result<(), EngineError> {
        let sql = format!(r#"DELETE FROM {} WHERE "timestamp" = $1"#, self.table);
        let tx = self.transaction().await?;

        sqlx::query(&sql)
            .bind(identifier.as_i64())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), EngineError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), EngineError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }
}
