use crate::adapter::database_error::DatabaseError;
use crate::domain::model::Money;
use crate::domain::port::{ReportRepository, RepositoryError};
use async_trait::async_trait;

// MySQL関連のインポート
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool, Row};

/// MySQLレポートリポジトリ
/// 支払済み販売に対する集計クエリを実行する
#[derive(Clone)]
pub struct MySqlReportRepository {
    pool: Pool<MySql>,
}

impl MySqlReportRepository {
    /// 新しいMySQLレポートリポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn total_sales(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Money, RepositoryError> {
        // SUMはDECIMALで返るため符号付き整数へキャストして受ける
        let row = sqlx::query(
            r#"
            SELECT CAST(COALESCE(SUM(total_amount_kobo), 0) AS SIGNED) AS total
            FROM sales
            WHERE paid = TRUE AND sale_date BETWEEN ? AND ?
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("売上合計の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let total: i64 = row.get("total");

        Ok(Money::from_kobo(total))
    }

    async fn profit_loss(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(Money, Money), RepositoryError> {
        // 明細は引当元バッチを保持しないため、原価は商品ごとの
        // バッチ平均原価で概算する
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(CAST(SUM(si.sale_price_kobo * si.quantity) AS SIGNED), 0) AS revenue,
                COALESCE(CAST(SUM(ac.avg_cost_kobo * si.quantity) AS SIGNED), 0) AS cost
            FROM sale_items si
            JOIN sales s ON si.sale_id = s.id
            LEFT JOIN (
                SELECT product_id, AVG(cost_price_kobo) AS avg_cost_kobo
                FROM stock_batches
                GROUP BY product_id
            ) ac ON si.product_id = ac.product_id
            WHERE s.paid = TRUE AND s.sale_date BETWEEN ? AND ?
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("損益の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let revenue: i64 = row.get("revenue");
        let cost: i64 = row.get("cost");

        Ok((Money::from_kobo(revenue), Money::from_kobo(cost)))
    }

    async fn sales_status_counts(&self) -> Result<(u64, u64), RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(CAST(SUM(paid = TRUE) AS SIGNED), 0) AS paid_count,
                COALESCE(CAST(SUM(paid = FALSE) AS SIGNED), 0) AS pending_count
            FROM sales
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::QueryError(format!("販売状況件数の取得に失敗しました: {}", e))
        })
        .map_err(RepositoryError::from)?;

        let paid_count: i64 = row.get("paid_count");
        let pending_count: i64 = row.get("pending_count");

        Ok((paid_count as u64, pending_count as u64))
    }
}
