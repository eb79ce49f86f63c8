use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use uuid::Uuid;

use crate::adapter::driver::request_dto::{
    AddStockRequest, CreateProductRequest, CreateSaleRequest, ReportRangeParams,
    RepriceStockRequest, UpdateProductRequest,
};
use crate::adapter::driver::response_dto::{
    CreateSaleResponse, ProductResponse, ProfitLossResponse, SalesStatusResponse,
    StockBatchResponse, TotalSalesResponse, VerifySaleResponse,
};
use crate::application::service::{CatalogService, CheckoutLine, CheckoutService, ReportService};
use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{BatchId, CustomerId, Money, ProductId};
use crate::domain::port::RepositoryError;

/// REST API用のエラーDTO
#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

// アプリケーションサービスを含む状態
pub type AppState = AppStateInner;

#[derive(Clone)]
pub struct AppStateInner {
    pub checkout_service: Arc<CheckoutService>,
    pub catalog_service: Arc<CatalogService>,
    pub report_service: Arc<ReportService>,
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/products", post(create_product).get(get_products))
        .route(
            "/products/:product_id",
            get(get_product).put(update_product),
        )
        .route("/stock", post(add_stock).get(get_stock_batches))
        .route("/stock/:batch_id", get(get_stock_batch).put(reprice_stock))
        .route("/sales", post(create_sale))
        .route("/sales/verify/:reference", get(verify_payment))
        .route("/reports/total-sales", get(total_sales_report))
        .route("/reports/profit-loss", get(profit_loss_report))
        .route("/reports/sales-status", get(sales_status_report))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "retail-sales-management",
        "version": "0.1.0"
    }))
}

/// 認証レイヤーが付与した識別ヘッダーから顧客IDとメールアドレスを取り出す
fn extract_identity(
    headers: &HeaderMap,
) -> Result<(CustomerId, String), (StatusCode, Json<ApiError>)> {
    let customer_id = headers
        .get("x-customer-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| CustomerId::from_string(value).ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: "X-Customer-Idヘッダーが無効です".to_string(),
                    code: "INVALID_IDENTITY".to_string(),
                }),
            )
        })?;

    let email = headers
        .get("x-customer-email")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.to_string())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: "X-Customer-Emailヘッダーが無効です".to_string(),
                    code: "INVALID_IDENTITY".to_string(),
                }),
            )
        })?;

    Ok((customer_id, email))
}

// 販売作成エンドポイント
// 全明細の引当 → 決済初期化 → 原子的永続化 を1リクエストで行う
async fn create_sale(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateSaleRequest>,
) -> Result<Json<CreateSaleResponse>, (StatusCode, Json<ApiError>)> {
    let (customer_id, email) = extract_identity(&headers)?;

    let lines: Vec<CheckoutLine> = request
        .items
        .iter()
        .map(|item| CheckoutLine {
            product_id: ProductId::from_uuid(item.product_id),
            quantity: item.quantity,
        })
        .collect();

    match state
        .checkout_service
        .create_sale(customer_id, &email, &lines)
        .await
    {
        Ok(receipt) => Ok(Json(CreateSaleResponse::from_receipt(&receipt))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 決済検証エンドポイント
// 決済プロバイダーからのリダイレクト後にクライアントが呼び出す
async fn verify_payment(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<VerifySaleResponse>, (StatusCode, Json<ApiError>)> {
    match state.checkout_service.verify_payment(&reference).await {
        Ok(outcome) => Ok(Json(VerifySaleResponse::from_outcome(&outcome))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 商品作成エンドポイント
async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), (StatusCode, Json<ApiError>)> {
    match state
        .catalog_service
        .create_product(request.name, request.description, request.image)
        .await
    {
        Ok(product) => Ok((
            StatusCode::CREATED,
            Json(ProductResponse::from_product(&product)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 商品更新エンドポイント（説明・画像参照のみ）
async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, (StatusCode, Json<ApiError>)> {
    let product_id = ProductId::from_uuid(product_id);

    match state
        .catalog_service
        .update_product(product_id, request.description, request.image)
        .await
    {
        Ok(product) => Ok(Json(ProductResponse::from_product(&product))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 商品詳細取得エンドポイント
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ProductResponse>, (StatusCode, Json<ApiError>)> {
    let product_id = ProductId::from_uuid(product_id);

    match state.catalog_service.get_product(product_id).await {
        Ok(Some(product)) => Ok(Json(ProductResponse::from_product(&product))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された商品が見つかりません".to_string(),
                code: "PRODUCT_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 商品一覧取得エンドポイント
async fn get_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, (StatusCode, Json<ApiError>)> {
    match state.catalog_service.get_all_products().await {
        Ok(products) => {
            let response: Vec<ProductResponse> =
                products.iter().map(ProductResponse::from_product).collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// 入荷エンドポイント（在庫バッチ作成）
async fn add_stock(
    State(state): State<AppState>,
    Json(request): Json<AddStockRequest>,
) -> Result<(StatusCode, Json<StockBatchResponse>), (StatusCode, Json<ApiError>)> {
    let product_id = ProductId::from_uuid(request.product_id);

    match state
        .catalog_service
        .add_stock(
            product_id,
            request.quantity,
            Money::from_kobo(request.cost_price),
            Money::from_kobo(request.selling_price),
        )
        .await
    {
        Ok(batch) => Ok((
            StatusCode::CREATED,
            Json(StockBatchResponse::from_batch(&batch)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 在庫バッチ価格変更エンドポイント
async fn reprice_stock(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(request): Json<RepriceStockRequest>,
) -> Result<Json<StockBatchResponse>, (StatusCode, Json<ApiError>)> {
    let batch_id = BatchId::from_uuid(batch_id);

    match state
        .catalog_service
        .reprice_stock(
            batch_id,
            Money::from_kobo(request.cost_price),
            Money::from_kobo(request.selling_price),
        )
        .await
    {
        Ok(batch) => Ok(Json(StockBatchResponse::from_batch(&batch))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 在庫バッチ詳細取得エンドポイント
async fn get_stock_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> Result<Json<StockBatchResponse>, (StatusCode, Json<ApiError>)> {
    let batch_id = BatchId::from_uuid(batch_id);

    match state.catalog_service.get_stock(batch_id).await {
        Ok(Some(batch)) => Ok(Json(StockBatchResponse::from_batch(&batch))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された在庫バッチが見つかりません".to_string(),
                code: "STOCK_BATCH_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 在庫バッチ一覧取得エンドポイント
async fn get_stock_batches(
    State(state): State<AppState>,
) -> Result<Json<Vec<StockBatchResponse>>, (StatusCode, Json<ApiError>)> {
    match state.catalog_service.get_all_stock().await {
        Ok(batches) => {
            let response: Vec<StockBatchResponse> = batches
                .iter()
                .map(StockBatchResponse::from_batch)
                .collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

/// レポート用のクエリパラメータを取り出す
fn extract_range(
    query: Result<Query<ReportRangeParams>, axum::extract::rejection::QueryRejection>,
) -> Result<ReportRangeParams, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効なクエリパラメータです（start・endはRFC 3339形式）".to_string(),
                code: "INVALID_PARAMETER".to_string(),
            }),
        )
    })?;
    Ok(params)
}

// 売上合計レポートエンドポイント
async fn total_sales_report(
    State(state): State<AppState>,
    query: Result<Query<ReportRangeParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<TotalSalesResponse>, (StatusCode, Json<ApiError>)> {
    let params = extract_range(query)?;

    match state
        .report_service
        .total_sales(params.start, params.end)
        .await
    {
        Ok(total) => Ok(Json(TotalSalesResponse {
            total_amount: total.kobo(),
            currency: total.currency(),
        })),
        Err(err) => Err(map_application_error(err)),
    }
}

// 損益レポートエンドポイント
async fn profit_loss_report(
    State(state): State<AppState>,
    query: Result<Query<ReportRangeParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<ProfitLossResponse>, (StatusCode, Json<ApiError>)> {
    let params = extract_range(query)?;

    match state
        .report_service
        .profit_loss(params.start, params.end)
        .await
    {
        Ok(report) => Ok(Json(ProfitLossResponse::from_report(&report))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 販売状況件数レポートエンドポイント
async fn sales_status_report(
    State(state): State<AppState>,
) -> Result<Json<SalesStatusResponse>, (StatusCode, Json<ApiError>)> {
    match state.report_service.sales_status_counts().await {
        Ok((paid_count, pending_count)) => Ok(Json(SalesStatusResponse {
            paid_count,
            pending_count,
        })),
        Err(err) => Err(map_application_error(err)),
    }
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> (StatusCode, Json<ApiError>) {
    match err {
        ApplicationError::DomainError(domain_err) => map_domain_error(domain_err),
        ApplicationError::RepositoryError(RepositoryError::Conflict(msg)) => (
            // 引当後に並行する販売が同じバッチを消費した場合
            StatusCode::CONFLICT,
            Json(ApiError {
                error: msg,
                code: "STOCK_CONFLICT".to_string(),
            }),
        ),
        ApplicationError::RepositoryError(repo_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: format!("{}", repo_err),
                code: "REPOSITORY_ERROR".to_string(),
            }),
        ),
        ApplicationError::GatewayError(gateway_err) => (
            // 初期化失敗時は何も書き込まれておらず、検証失敗時は販売がPendingのまま残る
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!("{}", gateway_err),
                code: "PAYMENT_GATEWAY_ERROR".to_string(),
            }),
        ),
        ApplicationError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: msg,
                code: "NOT_FOUND".to_string(),
            }),
        ),
    }
}

// ドメインエラーを適切なHTTPステータスコードとエラーコードにマッピング
fn map_domain_error(domain_err: DomainError) -> (StatusCode, Json<ApiError>) {
    match domain_err {
        DomainError::UnknownProduct(product_id) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!("商品が見つかりません: {}", product_id),
                code: "PRODUCT_NOT_FOUND".to_string(),
            }),
        ),
        DomainError::InsufficientStock {
            product_id,
            requested,
            available,
        } => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!(
                    "商品 {} の在庫が不足しています（要求: {}、利用可能: {}）",
                    product_id, requested, available
                ),
                code: "INSUFFICIENT_STOCK".to_string(),
            }),
        ),
        DomainError::InvalidQuantity => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効な数量です".to_string(),
                code: "INVALID_QUANTITY".to_string(),
            }),
        ),
        DomainError::UnknownSaleReference(reference) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!("決済参照に対応する販売が見つかりません: {}", reference),
                code: "SALE_NOT_FOUND".to_string(),
            }),
        ),
        DomainError::SaleValidation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "SALE_VALIDATION".to_string(),
            }),
        ),
        DomainError::CurrencyMismatch => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "通貨が一致しません".to_string(),
                code: "CURRENCY_MISMATCH".to_string(),
            }),
        ),
        DomainError::InvalidValue(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INVALID_VALUE".to_string(),
            }),
        ),
    }
}
