use crate::domain::error::DomainError;
use crate::domain::model::{CustomerId, Money, SaleId, SaleItem};
use chrono::{DateTime, Utc};

/// 販売集約
/// 1回のチェックアウトを表す。引当成功とゲートウェイの決済初期化が
/// 完了した時点で未払い（paid=false）で作成され、検証成功によって
/// 一度だけ支払済みに遷移する。支払済みから未払いへは戻らない
/// 不変条件: `total_amount == Σ(item.quantity × item.sale_price)`
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    id: SaleId,
    customer_id: CustomerId,
    sale_date: DateTime<Utc>,
    total_amount: Money,
    paid: bool,
    payment_reference: String,
    items: Vec<SaleItem>,
}

impl Sale {
    /// 新しい未払いの販売を作成
    ///
    /// # Arguments
    /// * `id` - 販売ID
    /// * `customer_id` - 顧客ID
    /// * `sale_date` - 作成日時
    /// * `total_amount` - 合計金額（明細合計と一致すること）
    /// * `payment_reference` - ゲートウェイが発行した決済参照
    /// * `items` - 販売明細（1件以上）
    pub fn new(
        id: SaleId,
        customer_id: CustomerId,
        sale_date: DateTime<Utc>,
        total_amount: Money,
        payment_reference: String,
        items: Vec<SaleItem>,
    ) -> Result<Self, DomainError> {
        Self::validate(&total_amount, &payment_reference, &items)?;
        Ok(Self {
            id,
            customer_id,
            sale_date,
            total_amount,
            paid: false,
            payment_reference,
            items,
        })
    }

    /// データベースから取得したデータで販売を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: SaleId,
        customer_id: CustomerId,
        sale_date: DateTime<Utc>,
        total_amount: Money,
        paid: bool,
        payment_reference: String,
        items: Vec<SaleItem>,
    ) -> Result<Self, DomainError> {
        Self::validate(&total_amount, &payment_reference, &items)?;
        Ok(Self {
            id,
            customer_id,
            sale_date,
            total_amount,
            paid,
            payment_reference,
            items,
        })
    }

    fn validate(
        total_amount: &Money,
        payment_reference: &str,
        items: &[SaleItem],
    ) -> Result<(), DomainError> {
        if items.is_empty() {
            return Err(DomainError::SaleValidation(
                "販売明細が空です".to_string(),
            ));
        }
        if payment_reference.trim().is_empty() {
            return Err(DomainError::SaleValidation(
                "決済参照が空です".to_string(),
            ));
        }
        let computed = items
            .iter()
            .map(|item| item.subtotal())
            .fold(Money::zero(), |acc, amount| acc.add(&amount).unwrap_or(acc));
        if computed != *total_amount {
            return Err(DomainError::SaleValidation(format!(
                "合計金額 {} が明細合計 {} と一致しません",
                total_amount, computed
            )));
        }
        Ok(())
    }

    /// 販売IDを取得
    pub fn id(&self) -> SaleId {
        self.id
    }

    /// 顧客IDを取得
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// 作成日時を取得
    pub fn sale_date(&self) -> DateTime<Utc> {
        self.sale_date
    }

    /// 合計金額を取得
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// 支払済みかどうかを取得
    pub fn paid(&self) -> bool {
        self.paid
    }

    /// 決済参照を取得
    pub fn payment_reference(&self) -> &str {
        &self.payment_reference
    }

    /// 販売明細のリストを取得
    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    /// 販売を支払済みにマークする
    /// 一方向の遷移。既に支払済みの場合は何もしない
    ///
    /// # Returns
    /// * `true` - この呼び出しで支払済みに遷移した
    /// * `false` - 既に支払済みだった（状態は変化しない）
    pub fn mark_paid(&mut self) -> bool {
        if self.paid {
            return false;
        }
        self.paid = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ProductId;

    fn items() -> Vec<SaleItem> {
        vec![
            SaleItem::new(ProductId::new(), 3, Money::from_kobo(1000)).unwrap(),
            SaleItem::new(ProductId::new(), 1, Money::from_kobo(1250)).unwrap(),
        ]
    }

    fn sale() -> Sale {
        Sale::new(
            SaleId::new(),
            CustomerId::new(),
            Utc::now(),
            Money::from_kobo(4250),
            "ref123".to_string(),
            items(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_sale_starts_unpaid() {
        let sale = sale();
        assert!(!sale.paid());
        assert_eq!(sale.payment_reference(), "ref123");
        assert_eq!(sale.items().len(), 2);
    }

    #[test]
    fn test_total_must_match_items() {
        let result = Sale::new(
            SaleId::new(),
            CustomerId::new(),
            Utc::now(),
            Money::from_kobo(9999),
            "ref123".to_string(),
            items(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_items_rejected() {
        let result = Sale::new(
            SaleId::new(),
            CustomerId::new(),
            Utc::now(),
            Money::zero(),
            "ref123".to_string(),
            Vec::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_reference_rejected() {
        let result = Sale::new(
            SaleId::new(),
            CustomerId::new(),
            Utc::now(),
            Money::from_kobo(4250),
            "".to_string(),
            items(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_mark_paid_is_one_way() {
        let mut sale = sale();
        assert!(sale.mark_paid());
        assert!(sale.paid());
        // 2回目は状態を変えずfalseを返す
        assert!(!sale.mark_paid());
        assert!(sale.paid());
    }
}
