use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{BatchId, Money, ProductId, StockBatch};
use crate::domain::port::{RepositoryError, StockBatchRepository};
use async_trait::async_trait;

// MySQL関連のインポート
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool, Row};

/// MySQL在庫バッチリポジトリ
/// 入荷・価格調整・照会を担当する
/// 販売に伴う減算はMySqlSaleRepositoryの決済トランザクションが行う
#[derive(Clone)]
pub struct MySqlStockBatchRepository {
    pool: Pool<MySql>,
}

impl MySqlStockBatchRepository {
    /// 新しいMySQL在庫バッチリポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から在庫バッチを再構築する
    fn build_batch_from_row(row: &sqlx::mysql::MySqlRow) -> Result<StockBatch, RepositoryError> {
        let batch_id = BatchId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("バッチIDの解析に失敗しました: {}", e))
        })?;
        let product_id = ProductId::from_string(row.get("product_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
        })?;

        StockBatch::reconstruct(
            batch_id,
            product_id,
            row.get::<u32, _>("quantity"),
            row.get::<u32, _>("remaining_quantity"),
            Money::from_kobo(row.get::<i64, _>("cost_price_kobo")),
            Money::from_kobo(row.get::<i64, _>("selling_price_kobo")),
            row.get::<DateTime<Utc>, _>("added_at"),
        )
        .map_err(|e| {
            RepositoryError::FetchFailed(format!("在庫バッチの再構築に失敗しました: {}", e))
        })
    }
}

#[async_trait]
impl StockBatchRepository for MySqlStockBatchRepository {
    async fn create(&self, batch: &StockBatch) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO stock_batches
                (id, product_id, quantity, remaining_quantity, cost_price_kobo, selling_price_kobo, added_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(batch.id().to_string())
        .bind(batch.product_id().to_string())
        .bind(batch.quantity())
        .bind(batch.remaining_quantity())
        .bind(batch.cost_price().kobo())
        .bind(batch.selling_price().kobo())
        .bind(batch.added_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫バッチの保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn reprice(
        &self,
        batch_id: BatchId,
        cost_price: Money,
        selling_price: Money,
    ) -> Result<Option<StockBatch>, RepositoryError> {
        sqlx::query(
            "UPDATE stock_batches SET cost_price_kobo = ?, selling_price_kobo = ? WHERE id = ?",
        )
        .bind(cost_price.kobo())
        .bind(selling_price.kobo())
        .bind(batch_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::QueryError(format!("在庫バッチの価格変更に失敗しました: {}", e))
        })
        .map_err(RepositoryError::from)?;

        self.find_by_id(batch_id).await
    }

    async fn find_by_id(&self, batch_id: BatchId) -> Result<Option<StockBatch>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, product_id, quantity, remaining_quantity,
                   cost_price_kobo, selling_price_kobo, added_at
            FROM stock_batches WHERE id = ?
            "#,
        )
        .bind(batch_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫バッチの取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::build_batch_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<StockBatch>, RepositoryError> {
        // 入荷日時の昇順で並べる
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, quantity, remaining_quantity,
                   cost_price_kobo, selling_price_kobo, added_at
            FROM stock_batches ORDER BY added_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::QueryError(format!("在庫バッチ一覧の取得に失敗しました: {}", e))
        })
        .map_err(RepositoryError::from)?;

        let mut batches = Vec::new();
        for row in rows {
            batches.push(Self::build_batch_from_row(&row)?);
        }

        Ok(batches)
    }

    fn next_identity(&self) -> BatchId {
        BatchId::new()
    }
}
