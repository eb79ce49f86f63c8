use crate::adapter::database_error::DatabaseError;
use sqlx::{MySql, Pool};

/// マイグレーション定義（名前, SQL）
/// すべてCREATE TABLE IF NOT EXISTSのため何度実行しても安全
const MIGRATIONS: [(&str, &str); 4] = [
    (
        "products",
        include_str!("../../migrations/001_create_products_table.sql"),
    ),
    (
        "stock_batches",
        include_str!("../../migrations/002_create_stock_batches_table.sql"),
    ),
    (
        "sales",
        include_str!("../../migrations/003_create_sales_table.sql"),
    ),
    (
        "sale_items",
        include_str!("../../migrations/004_create_sale_items_table.sql"),
    ),
];

/// データベースマイグレーションを管理する構造体
pub struct DatabaseMigration {
    pool: Pool<MySql>,
}

impl DatabaseMigration {
    /// 新しいDatabaseMigrationインスタンスを作成
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// マイグレーションを順番に実行
    pub async fn run(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            println!("Running migration: {}", name);
            sqlx::query(sql).execute(&self.pool).await.map_err(|e| {
                DatabaseError::MigrationError(format!("Migration {} failed: {}", name, e))
            })?;
        }

        println!("All migrations completed successfully");
        Ok(())
    }
}
