use crate::domain::error::DomainError;
use crate::domain::model::{ProductId, StockBatch};

/// 商品集約
/// 商品カタログ情報と、その商品に属する在庫バッチ（在庫台帳）を管理する
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    image: Option<String>,
    stock_batches: Vec<StockBatch>,
}

impl Product {
    /// 新しい商品を作成
    /// 在庫バッチは空の状態で開始する
    ///
    /// # Arguments
    /// * `id` - 商品ID
    /// * `name` - 商品名（空でないこと。一意性は永続化層で保証する）
    /// * `description` - 商品説明（オプション）
    /// * `image` - 画像参照（オプション）
    pub fn new(
        id: ProductId,
        name: String,
        description: Option<String>,
        image: Option<String>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "商品名は空にできません".to_string(),
            ));
        }
        Ok(Self {
            id,
            name,
            description,
            image,
            stock_batches: Vec::new(),
        })
    }

    /// データベースから取得したデータで商品を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: ProductId,
        name: String,
        description: Option<String>,
        image: Option<String>,
        stock_batches: Vec<StockBatch>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "商品名は空にできません".to_string(),
            ));
        }
        Ok(Self {
            id,
            name,
            description,
            image,
            stock_batches,
        })
    }

    /// 商品IDを取得
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// 商品名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 商品説明を取得
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 画像参照を取得
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// 在庫バッチのリストを取得
    pub fn stock_batches(&self) -> &[StockBatch] {
        &self.stock_batches
    }

    /// 商品説明と画像参照を更新
    /// 商品名と識別子は作成後に変更できない
    pub fn update_details(&mut self, description: Option<String>, image: Option<String>) {
        self.description = description;
        self.image = image;
    }

    /// 在庫バッチを追加（入荷）
    pub fn add_batch(&mut self, batch: StockBatch) -> Result<(), DomainError> {
        if batch.product_id() != self.id {
            return Err(DomainError::InvalidValue(
                "別の商品の在庫バッチは追加できません".to_string(),
            ));
        }
        self.stock_batches.push(batch);
        Ok(())
    }

    /// 全バッチの残数量の合計を取得
    pub fn total_remaining(&self) -> u32 {
        self.stock_batches
            .iter()
            .map(|batch| batch.remaining_quantity())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BatchId, Money};
    use chrono::Utc;

    fn batch_for(product_id: ProductId, quantity: u32) -> StockBatch {
        StockBatch::new(
            BatchId::new(),
            product_id,
            quantity,
            Money::from_kobo(300),
            Money::from_kobo(500),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_product_has_no_batches() {
        let product = Product::new(ProductId::new(), "Widget".to_string(), None, None).unwrap();
        assert_eq!(product.stock_batches().len(), 0);
        assert_eq!(product.total_remaining(), 0);
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Product::new(ProductId::new(), "  ".to_string(), None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_batch_accumulates_remaining() {
        let id = ProductId::new();
        let mut product = Product::new(id, "Widget".to_string(), None, None).unwrap();
        product.add_batch(batch_for(id, 3)).unwrap();
        product.add_batch(batch_for(id, 5)).unwrap();
        assert_eq!(product.stock_batches().len(), 2);
        assert_eq!(product.total_remaining(), 8);
    }

    #[test]
    fn test_add_batch_of_other_product_rejected() {
        let mut product =
            Product::new(ProductId::new(), "Widget".to_string(), None, None).unwrap();
        let result = product.add_batch(batch_for(ProductId::new(), 3));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_details() {
        let mut product =
            Product::new(ProductId::new(), "Widget".to_string(), None, None).unwrap();
        product.update_details(Some("blue widget".to_string()), Some("widget.png".to_string()));
        assert_eq!(product.description(), Some("blue widget"));
        assert_eq!(product.image(), Some("widget.png"));
        assert_eq!(product.name(), "Widget");
    }
}
