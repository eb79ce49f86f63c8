use crate::domain::error::DomainError;
use crate::domain::model::{BatchId, Money, ProductId};
use chrono::{DateTime, Utc};

/// 在庫バッチエンティティ
/// 1回の入荷で登録された在庫ロット。原価・売価・入荷日時を持ち、
/// 残数量は引当によってのみ減少する
/// 不変条件: `0 <= remaining_quantity <= quantity`
#[derive(Debug, Clone, PartialEq)]
pub struct StockBatch {
    id: BatchId,
    product_id: ProductId,
    quantity: u32,
    remaining_quantity: u32,
    cost_price: Money,
    selling_price: Money,
    added_at: DateTime<Utc>,
}

impl StockBatch {
    /// 新しい在庫バッチを作成
    /// 残数量は入荷数量と等しい状態で開始する
    ///
    /// # Arguments
    /// * `id` - バッチID
    /// * `product_id` - 商品ID
    /// * `quantity` - 入荷数量（1以上）
    /// * `cost_price` - 原価
    /// * `selling_price` - 売価
    /// * `added_at` - 入荷日時
    pub fn new(
        id: BatchId,
        product_id: ProductId,
        quantity: u32,
        cost_price: Money,
        selling_price: Money,
        added_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            id,
            product_id,
            quantity,
            remaining_quantity: quantity,
            cost_price,
            selling_price,
            added_at,
        })
    }

    /// データベースから取得したデータでバッチを再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: BatchId,
        product_id: ProductId,
        quantity: u32,
        remaining_quantity: u32,
        cost_price: Money,
        selling_price: Money,
        added_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if remaining_quantity > quantity {
            return Err(DomainError::InvalidValue(format!(
                "残数量 {} が入荷数量 {} を超えています",
                remaining_quantity, quantity
            )));
        }
        Ok(Self {
            id,
            product_id,
            quantity,
            remaining_quantity,
            cost_price,
            selling_price,
            added_at,
        })
    }

    /// バッチIDを取得
    pub fn id(&self) -> BatchId {
        self.id
    }

    /// 商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 入荷数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// 残数量を取得
    pub fn remaining_quantity(&self) -> u32 {
        self.remaining_quantity
    }

    /// 原価を取得
    pub fn cost_price(&self) -> Money {
        self.cost_price
    }

    /// 売価を取得
    pub fn selling_price(&self) -> Money {
        self.selling_price
    }

    /// 入荷日時を取得
    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// 指定された数量の残数があるかチェック
    pub fn has_remaining(&self, quantity: u32) -> bool {
        self.remaining_quantity >= quantity
    }

    /// 残数量から指定数量を引き落とす
    ///
    /// # Returns
    /// * `Ok(())` - 引き落とし成功
    /// * `Err(DomainError::InsufficientStock)` - 残数不足
    pub fn deduct(&mut self, quantity: u32) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        if !self.has_remaining(quantity) {
            return Err(DomainError::InsufficientStock {
                product_id: self.product_id,
                requested: quantity,
                available: self.remaining_quantity,
            });
        }
        self.remaining_quantity -= quantity;
        Ok(())
    }

    /// 原価・売価を変更する（入荷後の価格調整）
    /// 既存の販売明細には影響しない（明細は引当時点の売価を保持する）
    pub fn reprice(&mut self, cost_price: Money, selling_price: Money) {
        self.cost_price = cost_price;
        self.selling_price = selling_price;
    }
}
