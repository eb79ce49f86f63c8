use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// 商品の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    /// 新しい一意のProductIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから ProductId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からProductIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

/// 在庫バッチの一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(Uuid);

impl BatchId {
    /// 新しい一意のBatchIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから BatchId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からBatchIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

/// 販売の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleId(Uuid);

impl SaleId {
    /// 新しい一意のSaleIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから SaleId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からSaleIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for SaleId {
    fn default() -> Self {
        Self::new()
    }
}

/// 顧客の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// 新しい一意のCustomerIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから CustomerId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からCustomerIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

/// 通貨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// ナイジェリア・ナイラ
    #[allow(clippy::upper_case_acronyms)]
    NGN,
}

/// 金額を表す値オブジェクト
/// 金額は最小通貨単位（コボ、1ナイラ = 100コボ）の整数で保持し、
/// 浮動小数点の丸め誤差を排除する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// 金額（最小単位）と通貨文字列から作成
    pub fn new(amount: i64, currency: String) -> Result<Self, DomainError> {
        let currency = match currency.as_str() {
            "NGN" => Currency::NGN,
            _ => {
                return Err(DomainError::InvalidValue(format!(
                    "サポートされていない通貨: {}",
                    currency
                )))
            }
        };
        Ok(Self { amount, currency })
    }

    /// コボ（最小単位）からナイラ金額を作成
    pub fn from_kobo(amount: i64) -> Self {
        Self {
            amount,
            currency: Currency::NGN,
        }
    }

    /// ナイラ（主単位）から金額を作成
    pub fn ngn(major: i64) -> Self {
        Self {
            amount: major * 100,
            currency: Currency::NGN,
        }
    }

    /// 金額をコボ（最小単位）で取得
    /// 決済ゲートウェイへ渡す金額はこの値をそのまま使用する
    pub fn kobo(&self) -> i64 {
        self.amount
    }

    /// 通貨を文字列として取得
    pub fn currency(&self) -> String {
        match self.currency {
            Currency::NGN => "NGN".to_string(),
        }
    }

    /// 金額を加算
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch);
        }
        Ok(Money {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }

    /// 金額を数量で乗算
    pub fn multiply(&self, factor: u32) -> Money {
        Money {
            amount: self.amount * factor as i64,
            currency: self.currency,
        }
    }

    /// ゼロ金額
    pub fn zero() -> Self {
        Self::from_kobo(0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        write!(
            f,
            "{}₦{}.{:02}",
            sign,
            (self.amount / 100).abs(),
            (self.amount % 100).abs()
        )
    }
}

/// 販売明細を表す値オブジェクト
/// バッチの識別子は保持しない。引当時点のバッチ売価を
/// sale_priceとして固定し、後のバッチ価格変更の影響を受けない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    product_id: ProductId,
    quantity: u32,
    sale_price: Money,
}

impl SaleItem {
    /// 新しい販売明細を作成
    /// 数量は1以上である必要がある
    pub fn new(product_id: ProductId, quantity: u32, sale_price: Money) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            product_id,
            quantity,
            sale_price,
        })
    }

    /// 商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// 販売単価を取得
    pub fn sale_price(&self) -> Money {
        self.sale_price
    }

    /// 小計を計算（単価 × 数量）
    pub fn subtotal(&self) -> Money {
        self.sale_price.multiply(self.quantity)
    }
}

/// バッチ引当を表す値オブジェクト（一時データ、永続化しない）
/// 1つの要求明細に対してFIFO順に引き当てたバッチと数量の組
#[derive(Debug, Clone, PartialEq)]
pub struct BatchAllocation {
    batch_id: BatchId,
    quantity: u32,
    unit_price: Money,
}

impl BatchAllocation {
    /// 新しいバッチ引当を作成
    pub fn new(batch_id: BatchId, quantity: u32, unit_price: Money) -> Self {
        Self {
            batch_id,
            quantity,
            unit_price,
        }
    }

    /// バッチIDを取得
    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    /// 引当数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// 引当時点のバッチ売価を取得
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_creation() {
        let id1 = ProductId::new();
        let id2 = ProductId::new();
        assert_ne!(id1, id2, "Each ProductId should be unique");
    }

    #[test]
    fn test_money_from_kobo_and_ngn() {
        let money = Money::ngn(50);
        assert_eq!(money.kobo(), 5000);
        assert_eq!(money, Money::from_kobo(5000));
    }

    #[test]
    fn test_money_addition() {
        let money1 = Money::from_kobo(1000);
        let money2 = Money::from_kobo(500);
        let result = money1.add(&money2).unwrap();
        assert_eq!(result.kobo(), 1500);
    }

    #[test]
    fn test_money_multiplication() {
        let money = Money::from_kobo(100);
        let result = money.multiply(5);
        assert_eq!(result.kobo(), 500);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(format!("{}", Money::from_kobo(5000)), "₦50.00");
        assert_eq!(format!("{}", Money::from_kobo(1250)), "₦12.50");
        assert_eq!(format!("{}", Money::from_kobo(-550)), "-₦5.50");
    }

    #[test]
    fn test_money_unsupported_currency() {
        let result = Money::new(1000, "USD".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_sale_item_creation() {
        let product_id = ProductId::new();
        let price = Money::from_kobo(1000);
        let item = SaleItem::new(product_id, 2, price).unwrap();
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.subtotal().kobo(), 2000);
    }

    #[test]
    fn test_sale_item_invalid_quantity() {
        let product_id = ProductId::new();
        let price = Money::from_kobo(1000);
        let result = SaleItem::new(product_id, 0, price);
        assert!(result.is_err());
    }

    #[test]
    fn test_batch_allocation_accessors() {
        let batch_id = BatchId::new();
        let allocation = BatchAllocation::new(batch_id, 3, Money::from_kobo(1000));
        assert_eq!(allocation.batch_id(), batch_id);
        assert_eq!(allocation.quantity(), 3);
        assert_eq!(allocation.unit_price().kobo(), 1000);
    }
}
