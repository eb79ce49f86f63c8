use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{BatchId, Money, Product, ProductId, StockBatch};
use crate::domain::port::{ProductRepository, RepositoryError};
use async_trait::async_trait;

// MySQL関連のインポート
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool, Row};

/// MySQL商品リポジトリ
/// MySQLデータベースを使用して商品と在庫バッチを永続化する
#[derive(Clone)]
pub struct MySqlProductRepository {
    pool: Pool<MySql>,
}

impl MySqlProductRepository {
    /// 新しいMySQL商品リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// JOINされた行から在庫バッチを再構築する
    fn build_batch_from_row(
        product_id: ProductId,
        row: &sqlx::mysql::MySqlRow,
    ) -> Result<Option<StockBatch>, RepositoryError> {
        // LEFT JOINのためバッチ列はNULLの場合がある
        let batch_id_str: Option<String> = row.get("batch_id");
        let batch_id_str = match batch_id_str {
            Some(s) => s,
            None => return Ok(None),
        };

        let batch_id = BatchId::from_string(&batch_id_str).map_err(|e| {
            RepositoryError::FetchFailed(format!("バッチIDの解析に失敗しました: {}", e))
        })?;

        let batch = StockBatch::reconstruct(
            batch_id,
            product_id,
            row.get::<u32, _>("batch_quantity"),
            row.get::<u32, _>("remaining_quantity"),
            Money::from_kobo(row.get::<i64, _>("cost_price_kobo")),
            Money::from_kobo(row.get::<i64, _>("selling_price_kobo")),
            row.get::<DateTime<Utc>, _>("added_at"),
        )
        .map_err(|e| {
            RepositoryError::FetchFailed(format!("在庫バッチの再構築に失敗しました: {}", e))
        })?;

        Ok(Some(batch))
    }

    /// データベースの行から商品オブジェクトのリストを構築する
    /// JOINされた結果から複数の商品を再構築する
    fn build_products_from_rows(
        &self,
        rows: Vec<sqlx::mysql::MySqlRow>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut products = Vec::new();
        let mut current: Option<(String, Product)> = None;

        // クエリは商品ID・入荷日時の順で並んでいる前提
        for row in &rows {
            let product_id_str: String = row.get("id");

            let needs_new = match &current {
                Some((id, _)) => id != &product_id_str,
                None => true,
            };

            if needs_new {
                if let Some((_, product)) = current.take() {
                    products.push(product);
                }

                let product_id = ProductId::from_string(&product_id_str).map_err(|e| {
                    RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
                })?;
                let product = Product::reconstruct(
                    product_id,
                    row.get("name"),
                    row.get::<Option<String>, _>("description"),
                    row.get::<Option<String>, _>("image"),
                    Vec::new(),
                )
                .map_err(|e| {
                    RepositoryError::FetchFailed(format!("商品の再構築に失敗しました: {}", e))
                })?;
                current = Some((product_id_str, product));
            }

            if let Some((_, product)) = &mut current {
                if let Some(batch) = Self::build_batch_from_row(product.id(), row)? {
                    product.add_batch(batch).map_err(|e| {
                        RepositoryError::FetchFailed(format!(
                            "在庫バッチの追加に失敗しました: {}",
                            e
                        ))
                    })?;
                }
            }
        }

        if let Some((_, product)) = current.take() {
            products.push(product);
        }

        Ok(products)
    }

    const SELECT_WITH_BATCHES: &'static str = r#"
        SELECT
            p.id, p.name, p.description, p.image,
            sb.id AS batch_id, sb.quantity AS batch_quantity, sb.remaining_quantity,
            sb.cost_price_kobo, sb.selling_price_kobo, sb.added_at
        FROM products p
        LEFT JOIN stock_batches sb ON p.id = sb.product_id
    "#;
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn create(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, image)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(product.id().to_string())
        .bind(product.name())
        .bind(product.description())
        .bind(product.image())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn update_details(
        &self,
        product_id: ProductId,
        description: Option<String>,
        image: Option<String>,
    ) -> Result<Option<Product>, RepositoryError> {
        sqlx::query("UPDATE products SET description = ?, image = ? WHERE id = ?")
            .bind(description)
            .bind(image)
            .bind(product_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("商品の更新に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        // 値が変わらない更新ではaffected rowsが0になるため、存在確認は再取得で行う
        self.find_by_id(product_id).await
    }

    async fn find_by_id(&self, product_id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "{} WHERE p.id = ? ORDER BY p.id, sb.added_at ASC",
            Self::SELECT_WITH_BATCHES
        );
        let rows = sqlx::query(&sql)
            .bind(product_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("商品の取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        let mut products = self.build_products_from_rows(rows)?;
        Ok(products.pop())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "{} WHERE p.name = ? ORDER BY p.id, sb.added_at ASC",
            Self::SELECT_WITH_BATCHES
        );
        let rows = sqlx::query(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("商品の取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        let mut products = self.build_products_from_rows(rows)?;
        Ok(products.pop())
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "{} ORDER BY p.name ASC, p.id, sb.added_at ASC",
            Self::SELECT_WITH_BATCHES
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("商品一覧の取得に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        self.build_products_from_rows(rows)
    }

    fn next_identity(&self) -> ProductId {
        ProductId::new()
    }
}
