use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{BatchId, Money, Product, ProductId, StockBatch};
use crate::domain::port::{ProductRepository, StockBatchRepository};
use chrono::Utc;
use std::sync::Arc;

/// カタログアプリケーションサービス
/// 商品の作成・更新・照会と、入荷・価格調整を提供する
pub struct CatalogService {
    product_repository: Arc<dyn ProductRepository>,
    stock_batch_repository: Arc<dyn StockBatchRepository>,
}

impl CatalogService {
    /// 新しいカタログサービスを作成
    ///
    /// # Arguments
    /// * `product_repository` - 商品リポジトリ
    /// * `stock_batch_repository` - 在庫バッチリポジトリ
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        stock_batch_repository: Arc<dyn StockBatchRepository>,
    ) -> Self {
        Self {
            product_repository,
            stock_batch_repository,
        }
    }

    /// 新しい商品を作成
    /// 商品名は一意であること
    pub async fn create_product(
        &self,
        name: String,
        description: Option<String>,
        image: Option<String>,
    ) -> Result<Product, ApplicationError> {
        if self.product_repository.find_by_name(&name).await?.is_some() {
            return Err(
                DomainError::InvalidValue(format!("商品名 {} は既に使用されています", name)).into(),
            );
        }

        let product = Product::new(
            self.product_repository.next_identity(),
            name,
            description,
            image,
        )?;
        self.product_repository.create(&product).await?;
        Ok(product)
    }

    /// 商品の説明と画像参照を更新
    ///
    /// # Returns
    /// * `Ok(Product)` - 更新後の商品
    /// * `Err(ApplicationError::NotFound)` - 商品が見つからなかった
    pub async fn update_product(
        &self,
        product_id: ProductId,
        description: Option<String>,
        image: Option<String>,
    ) -> Result<Product, ApplicationError> {
        self.product_repository
            .update_details(product_id, description, image)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("商品が見つかりません: {}", product_id))
            })
    }

    /// 商品IDで商品を取得（在庫バッチ込み）
    pub async fn get_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Product>, ApplicationError> {
        self.product_repository
            .find_by_id(product_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// すべての商品を取得
    /// 商品名の昇順で並べて返す
    pub async fn get_all_products(&self) -> Result<Vec<Product>, ApplicationError> {
        self.product_repository
            .find_all()
            .await
            .map_err(ApplicationError::from)
    }

    /// 在庫を入荷する（新しいバッチを作成）
    ///
    /// # Arguments
    /// * `product_id` - 商品ID
    /// * `quantity` - 入荷数量（1以上）
    /// * `cost_price` - 原価
    /// * `selling_price` - 売価
    pub async fn add_stock(
        &self,
        product_id: ProductId,
        quantity: u32,
        cost_price: Money,
        selling_price: Money,
    ) -> Result<StockBatch, ApplicationError> {
        // 入荷先の商品が存在することを確認する
        if self
            .product_repository
            .find_by_id(product_id)
            .await?
            .is_none()
        {
            return Err(DomainError::UnknownProduct(product_id).into());
        }

        let batch = StockBatch::new(
            self.stock_batch_repository.next_identity(),
            product_id,
            quantity,
            cost_price,
            selling_price,
            Utc::now(),
        )?;
        self.stock_batch_repository.create(&batch).await?;
        Ok(batch)
    }

    /// バッチの原価・売価を変更
    /// 既存の販売明細の価格（引当時点の売価）には影響しない
    pub async fn reprice_stock(
        &self,
        batch_id: BatchId,
        cost_price: Money,
        selling_price: Money,
    ) -> Result<StockBatch, ApplicationError> {
        self.stock_batch_repository
            .reprice(batch_id, cost_price, selling_price)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("在庫バッチが見つかりません: {}", batch_id))
            })
    }

    /// バッチIDで在庫バッチを取得
    pub async fn get_stock(
        &self,
        batch_id: BatchId,
    ) -> Result<Option<StockBatch>, ApplicationError> {
        self.stock_batch_repository
            .find_by_id(batch_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// すべての在庫バッチを取得
    /// 入荷日時の昇順で並べて返す
    pub async fn get_all_stock(&self) -> Result<Vec<StockBatch>, ApplicationError> {
        self.stock_batch_repository
            .find_all()
            .await
            .map_err(ApplicationError::from)
    }
}
