use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{CustomerId, Money, ProductId, Sale, SaleId, SaleItem};
use crate::domain::port::{RepositoryError, SaleRepository, StockDecrement};
use async_trait::async_trait;

// MySQL関連のインポート
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool, Row};

/// MySQL販売リポジトリ
/// 販売の永続化と決済の確定を担当する
/// 販売行・明細・在庫減算は1つのトランザクションで書き込み、
/// 課金済みなのに在庫が減っていない中途半端な状態を構造的に排除する
pub struct MySqlSaleRepository {
    pool: Pool<MySql>,
}

impl MySqlSaleRepository {
    /// 新しいMySQL販売リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SaleRepository for MySqlSaleRepository {
    async fn create_with_decrements(
        &self,
        sale: &Sale,
        decrements: &[StockDecrement],
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!(
                    "トランザクション開始に失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        // 販売行をINSERT
        sqlx::query(
            r#"
            INSERT INTO sales (id, customer_id, sale_date, total_amount_kobo, paid, payment_reference)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sale.id().to_string())
        .bind(sale.customer_id().to_string())
        .bind(sale.sale_date())
        .bind(sale.total_amount().kobo())
        .bind(sale.paid())
        .bind(sale.payment_reference())
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("販売の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        // 販売明細をINSERT
        for item in sale.items() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity, sale_price_kobo)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(sale.id().to_string())
            .bind(item.product_id().to_string())
            .bind(item.quantity())
            .bind(item.sale_price().kobo())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("販売明細の保存に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;
        }

        // 在庫減算を比較交換で適用する
        // 引当後に他のリクエストが同じバッチを消費していた場合は
        // 条件が不成立（affected rows = 0）となり、全体をロールバックする
        for decrement in decrements {
            let result = sqlx::query(
                r#"
                UPDATE stock_batches
                SET remaining_quantity = remaining_quantity - ?
                WHERE id = ? AND remaining_quantity >= ?
                "#,
            )
            .bind(decrement.quantity)
            .bind(decrement.batch_id.to_string())
            .bind(decrement.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("在庫の減算に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

            if result.rows_affected() == 0 {
                tx.rollback().await.map_err(|e| {
                    RepositoryError::OperationFailed(format!(
                        "トランザクションのロールバックに失敗しました: {}",
                        e
                    ))
                })?;
                return Err(RepositoryError::Conflict(format!(
                    "在庫バッチ {} の残数が並行する販売により不足しました",
                    decrement.batch_id
                )));
            }
        }

        // トランザクションをコミット
        tx.commit()
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!(
                    "トランザクションのコミットに失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Sale>, RepositoryError> {
        // salesテーブルとsale_itemsテーブルをJOINして取得
        let rows = sqlx::query(
            r#"
            SELECT
                s.id, s.customer_id, s.sale_date, s.total_amount_kobo, s.paid, s.payment_reference,
                si.product_id, si.quantity, si.sale_price_kobo
            FROM sales s
            LEFT JOIN sale_items si ON s.id = si.sale_id
            WHERE s.payment_reference = ?
            ORDER BY si.id ASC
            "#,
        )
        .bind(reference)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("販売の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        if rows.is_empty() {
            return Ok(None);
        }

        // 最初の行から販売の基本情報を取得
        let first_row = &rows[0];
        let sale_id = SaleId::from_string(first_row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("販売IDの解析に失敗しました: {}", e))
        })?;
        let customer_id = CustomerId::from_string(first_row.get("customer_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("顧客IDの解析に失敗しました: {}", e))
        })?;

        // 販売明細を再構築
        let mut items = Vec::new();
        for row in &rows {
            if let (Some(product_id_str), Some(quantity), Some(sale_price_kobo)) = (
                row.get::<Option<String>, _>("product_id"),
                row.get::<Option<u32>, _>("quantity"),
                row.get::<Option<i64>, _>("sale_price_kobo"),
            ) {
                let product_id = ProductId::from_string(&product_id_str).map_err(|e| {
                    RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
                })?;
                let item = SaleItem::new(product_id, quantity, Money::from_kobo(sale_price_kobo))
                    .map_err(|e| {
                        RepositoryError::FetchFailed(format!(
                            "販売明細の再構築に失敗しました: {}",
                            e
                        ))
                    })?;
                items.push(item);
            }
        }

        // 販売集約を再構築
        let sale = Sale::reconstruct(
            sale_id,
            customer_id,
            first_row.get::<DateTime<Utc>, _>("sale_date"),
            Money::from_kobo(first_row.get::<i64, _>("total_amount_kobo")),
            first_row.get::<bool, _>("paid"),
            first_row.get("payment_reference"),
            items,
        )
        .map_err(|e| {
            RepositoryError::FetchFailed(format!("販売集約の再構築に失敗しました: {}", e))
        })?;

        Ok(Some(sale))
    }

    async fn mark_paid(&self, sale_id: SaleId) -> Result<bool, RepositoryError> {
        // 比較交換: 未払いの場合のみ支払済みに更新する
        // 並行する検証が先に確定していた場合はaffected rows = 0となる
        let result = sqlx::query("UPDATE sales SET paid = TRUE WHERE id = ? AND paid = FALSE")
            .bind(sale_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("販売の支払確定に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        Ok(result.rows_affected() > 0)
    }

    fn next_identity(&self) -> SaleId {
        SaleId::new()
    }
}
