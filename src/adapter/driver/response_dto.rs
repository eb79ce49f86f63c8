use crate::application::service::{CheckoutReceipt, ProfitLossReport, VerificationOutcome};
use crate::domain::model::{Product, StockBatch};
use serde::{Deserialize, Serialize};

/// 販売作成用のレスポンスDTO
/// 呼び出し元を決済ページへリダイレクトするための情報を含む
#[derive(Serialize, Deserialize)]
pub struct CreateSaleResponse {
    pub status: bool,
    pub sale_id: String,
    pub total_amount: i64,
    pub currency: String,
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// 決済検証用のレスポンスDTO
#[derive(Serialize, Deserialize)]
pub struct VerifySaleResponse {
    pub status: bool,
    pub message: String,
    pub sale_id: String,
    pub payment_status: String,
}

/// 在庫バッチ用のレスポンスDTO
#[derive(Serialize, Deserialize)]
pub struct StockBatchResponse {
    pub batch_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub remaining_quantity: u32,
    pub cost_price: i64,
    pub selling_price: i64,
    pub currency: String,
    pub added_at: String,
}

/// 商品用のレスポンスDTO（在庫バッチ込み）
#[derive(Serialize, Deserialize)]
pub struct ProductResponse {
    pub product_id: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub total_remaining: u32,
    pub stock_batches: Vec<StockBatchResponse>,
}

/// 売上合計レポート用のレスポンスDTO
#[derive(Serialize, Deserialize)]
pub struct TotalSalesResponse {
    pub total_amount: i64,
    pub currency: String,
}

/// 損益レポート用のレスポンスDTO
#[derive(Serialize, Deserialize)]
pub struct ProfitLossResponse {
    pub revenue: i64,
    pub cost: i64,
    pub profit: i64,
    pub currency: String,
}

/// 販売状況件数用のレスポンスDTO
#[derive(Serialize, Deserialize)]
pub struct SalesStatusResponse {
    pub paid_count: u64,
    pub pending_count: u64,
}

impl CreateSaleResponse {
    /// チェックアウト結果からCreateSaleResponseを作成
    pub fn from_receipt(receipt: &CheckoutReceipt) -> Self {
        Self {
            status: true,
            sale_id: receipt.sale_id.to_string(),
            total_amount: receipt.total_amount.kobo(),
            currency: receipt.total_amount.currency(),
            authorization_url: receipt.authorization_url.clone(),
            access_code: receipt.access_code.clone(),
            reference: receipt.reference.clone(),
        }
    }
}

impl VerifySaleResponse {
    /// 検証結果からVerifySaleResponseを作成
    pub fn from_outcome(outcome: &VerificationOutcome) -> Self {
        Self {
            status: true,
            message: outcome.message.clone(),
            sale_id: outcome.sale_id.to_string(),
            payment_status: outcome.payment_status.clone(),
        }
    }
}

impl StockBatchResponse {
    /// ドメインオブジェクトからStockBatchResponseを作成
    pub fn from_batch(batch: &StockBatch) -> Self {
        Self {
            batch_id: batch.id().to_string(),
            product_id: batch.product_id().to_string(),
            quantity: batch.quantity(),
            remaining_quantity: batch.remaining_quantity(),
            cost_price: batch.cost_price().kobo(),
            selling_price: batch.selling_price().kobo(),
            currency: batch.selling_price().currency(),
            added_at: batch.added_at().to_rfc3339(),
        }
    }
}

impl ProductResponse {
    /// ドメインオブジェクトからProductResponseを作成
    pub fn from_product(product: &Product) -> Self {
        let stock_batches: Vec<StockBatchResponse> = product
            .stock_batches()
            .iter()
            .map(StockBatchResponse::from_batch)
            .collect();

        Self {
            product_id: product.id().to_string(),
            name: product.name().to_string(),
            description: product.description().map(|s| s.to_string()),
            image: product.image().map(|s| s.to_string()),
            total_remaining: product.total_remaining(),
            stock_batches,
        }
    }
}

impl ProfitLossResponse {
    /// レポート結果からProfitLossResponseを作成
    pub fn from_report(report: &ProfitLossReport) -> Self {
        Self {
            revenue: report.revenue.kobo(),
            cost: report.cost.kobo(),
            profit: report.profit.kobo(),
            currency: report.revenue.currency(),
        }
    }
}
