use crate::domain::model::ProductId;

/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 商品が見つからない（例: 存在しない商品IDで販売しようとした）
    UnknownProduct(ProductId),
    /// 在庫不足（商品ID・要求数量・利用可能数量を保持する）
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
    /// 無効な数量（例: 0の数量で販売・入荷しようとした）
    InvalidQuantity,
    /// 決済参照が見つからない（例: 存在しない参照で検証しようとした）
    UnknownSaleReference(String),
    /// 販売の検証失敗（例: 明細が空、合計金額の不整合）
    SaleValidation(String),
    /// 通貨の不一致
    CurrencyMismatch,
    /// 無効な値
    InvalidValue(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::UnknownProduct(id) => write!(f, "Unknown product: {}", id),
            DomainError::InsufficientStock {
                product_id,
                requested,
                available,
            } => write!(
                f,
                "Insufficient stock for product {}: requested {}, available {}",
                product_id, requested, available
            ),
            DomainError::InvalidQuantity => write!(f, "Invalid quantity"),
            DomainError::UnknownSaleReference(reference) => {
                write!(f, "Unknown sale reference: {}", reference)
            }
            DomainError::SaleValidation(msg) => write!(f, "Sale validation failed: {}", msg),
            DomainError::CurrencyMismatch => write!(f, "Currency mismatch"),
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
