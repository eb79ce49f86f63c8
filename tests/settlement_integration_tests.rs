use retail_sales_management::adapter::driven::ConsoleLogger;
use retail_sales_management::application::service::{CheckoutLine, CheckoutService};
use retail_sales_management::application::ApplicationError;
use retail_sales_management::domain::error::DomainError;
use retail_sales_management::domain::model::{
    BatchId, CustomerId, Money, Product, ProductId, Sale, SaleId, StockBatch,
};
use retail_sales_management::domain::port::{
    GatewayError, PaymentGateway, PaymentInit, PaymentVerification, ProductRepository,
    RepositoryError, SaleRepository, StockDecrement,
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

// テスト用のモック商品リポジトリ
// 在庫ストアは販売リポジトリと共有し、決済トランザクションの
// 在庫減算を観察できるようにする
struct MockProductRepository {
    products: Arc<Mutex<HashMap<ProductId, Product>>>,
}

impl MockProductRepository {
    fn new(products: Arc<Mutex<HashMap<ProductId, Product>>>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn create(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut products = self.products.lock().await;
        products.insert(product.id(), product.clone());
        Ok(())
    }

    async fn update_details(
        &self,
        product_id: ProductId,
        description: Option<String>,
        image: Option<String>,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut products = self.products.lock().await;
        match products.get_mut(&product_id) {
            Some(product) => {
                product.update_details(description, image);
                Ok(Some(product.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, product_id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.lock().await;
        Ok(products.get(&product_id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.lock().await;
        Ok(products.values().find(|p| p.name() == name).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.lock().await;
        Ok(products.values().cloned().collect())
    }

    fn next_identity(&self) -> ProductId {
        ProductId::new()
    }
}

// テスト用のモック販売リポジトリ
// create_with_decrementsはMySQL実装と同じ意味論を持つ:
// 全減算が適用できる場合のみ販売を保存し、不成立なら何も変更しない
struct MockSaleRepository {
    sales: Arc<Mutex<HashMap<SaleId, Sale>>>,
    products: Arc<Mutex<HashMap<ProductId, Product>>>,
    conflict_on_create: bool,
}

impl MockSaleRepository {
    fn new(
        sales: Arc<Mutex<HashMap<SaleId, Sale>>>,
        products: Arc<Mutex<HashMap<ProductId, Product>>>,
    ) -> Self {
        Self {
            sales,
            products,
            conflict_on_create: false,
        }
    }

    fn with_conflict(mut self) -> Self {
        self.conflict_on_create = true;
        self
    }

    fn rebuild_with_deduction(
        product: &Product,
        batch_id: BatchId,
        quantity: u32,
    ) -> Result<Product, RepositoryError> {
        let mut batches = product.stock_batches().to_vec();
        for batch in batches.iter_mut() {
            if batch.id() == batch_id {
                batch.deduct(quantity).map_err(|e| {
                    RepositoryError::Conflict(format!("在庫バッチの残数が不足しました: {}", e))
                })?;
            }
        }
        Product::reconstruct(
            product.id(),
            product.name().to_string(),
            product.description().map(String::from),
            product.image().map(String::from),
            batches,
        )
        .map_err(|e| RepositoryError::OperationFailed(e.to_string()))
    }
}

#[async_trait]
impl SaleRepository for MockSaleRepository {
    async fn create_with_decrements(
        &self,
        sale: &Sale,
        decrements: &[StockDecrement],
    ) -> Result<(), RepositoryError> {
        if self.conflict_on_create {
            return Err(RepositoryError::Conflict(
                "並行する販売により在庫が不足しました".to_string(),
            ));
        }

        let mut products = self.products.lock().await;

        // 全減算を検証してから反映する（トランザクションのロールバックを模倣）
        let mut updated: HashMap<ProductId, Product> = HashMap::new();
        for decrement in decrements {
            let owner_id = products
                .values()
                .find(|p| {
                    p.stock_batches()
                        .iter()
                        .any(|b| b.id() == decrement.batch_id)
                })
                .map(|p| p.id())
                .ok_or_else(|| {
                    RepositoryError::Conflict("在庫バッチが見つかりません".to_string())
                })?;

            let source = updated
                .get(&owner_id)
                .cloned()
                .or_else(|| products.get(&owner_id).cloned())
                .ok_or_else(|| {
                    RepositoryError::OperationFailed("商品が見つかりません".to_string())
                })?;
            let rebuilt =
                Self::rebuild_with_deduction(&source, decrement.batch_id, decrement.quantity)?;
            updated.insert(owner_id, rebuilt);
        }

        for (product_id, product) in updated {
            products.insert(product_id, product);
        }

        let mut sales = self.sales.lock().await;
        sales.insert(sale.id(), sale.clone());
        Ok(())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Sale>, RepositoryError> {
        let sales = self.sales.lock().await;
        Ok(sales
            .values()
            .find(|sale| sale.payment_reference() == reference)
            .cloned())
    }

    async fn mark_paid(&self, sale_id: SaleId) -> Result<bool, RepositoryError> {
        let mut sales = self.sales.lock().await;
        match sales.get_mut(&sale_id) {
            Some(sale) => Ok(sale.mark_paid()),
            None => Ok(false),
        }
    }

    fn next_identity(&self) -> SaleId {
        SaleId::new()
    }
}

// テスト用のスタブ決済ゲートウェイ
// 呼び出し回数と引数を記録し、冪等性の検証に使用する
struct StubPaymentGateway {
    init_calls: Arc<Mutex<Vec<(String, i64)>>>,
    verify_calls: Arc<Mutex<Vec<String>>>,
    fail_initialize: bool,
    fail_verify: bool,
}

impl StubPaymentGateway {
    fn new() -> Self {
        Self {
            init_calls: Arc::new(Mutex::new(Vec::new())),
            verify_calls: Arc::new(Mutex::new(Vec::new())),
            fail_initialize: false,
            fail_verify: false,
        }
    }

    fn failing_initialize() -> Self {
        Self {
            fail_initialize: true,
            ..Self::new()
        }
    }

    fn failing_verify() -> Self {
        Self {
            fail_verify: true,
            ..Self::new()
        }
    }

    async fn init_call_count(&self) -> usize {
        self.init_calls.lock().await.len()
    }

    async fn verify_call_count(&self) -> usize {
        self.verify_calls.lock().await.len()
    }
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn initialize(
        &self,
        email: &str,
        amount_kobo: i64,
    ) -> Result<PaymentInit, GatewayError> {
        if self.fail_initialize {
            return Err(GatewayError::RequestFailed("connection refused".to_string()));
        }
        let mut calls = self.init_calls.lock().await;
        calls.push((email.to_string(), amount_kobo));
        let reference = format!("ref-{}", calls.len());
        Ok(PaymentInit {
            authorization_url: format!("https://checkout.paystack.test/{}", reference),
            access_code: format!("access-{}", calls.len()),
            reference,
        })
    }

    async fn verify(&self, reference: &str) -> Result<PaymentVerification, GatewayError> {
        if self.fail_verify {
            return Err(GatewayError::RequestFailed("connection refused".to_string()));
        }
        self.verify_calls.lock().await.push(reference.to_string());
        Ok(PaymentVerification {
            status: "success".to_string(),
            raw: serde_json::json!({ "data": { "status": "success" } }),
        })
    }
}

// テスト用フィクスチャ
struct Fixture {
    products: Arc<Mutex<HashMap<ProductId, Product>>>,
    sales: Arc<Mutex<HashMap<SaleId, Sale>>>,
    gateway: Arc<StubPaymentGateway>,
    service: CheckoutService,
}

fn build_fixture(gateway: StubPaymentGateway) -> Fixture {
    let products = Arc::new(Mutex::new(HashMap::new()));
    let sales = Arc::new(Mutex::new(HashMap::new()));
    let gateway = Arc::new(gateway);
    let service = CheckoutService::new(
        Arc::new(MockProductRepository::new(products.clone())),
        Arc::new(MockSaleRepository::new(sales.clone(), products.clone())),
        gateway.clone(),
        Arc::new(ConsoleLogger::new()),
    );
    Fixture {
        products,
        sales,
        gateway,
        service,
    }
}

async fn seed_product(
    fixture: &Fixture,
    name: &str,
    batches: Vec<(u32, i64, i64)>, // (数量, 売価コボ, 経過日数)
) -> (ProductId, Vec<BatchId>) {
    let product_id = ProductId::new();
    let mut product = Product::new(product_id, name.to_string(), None, None).unwrap();
    let mut batch_ids = Vec::new();
    for (quantity, price_kobo, age_days) in batches {
        let batch = StockBatch::new(
            BatchId::new(),
            product_id,
            quantity,
            Money::from_kobo(price_kobo / 2),
            Money::from_kobo(price_kobo),
            Utc::now() - Duration::days(age_days),
        )
        .unwrap();
        batch_ids.push(batch.id());
        product.add_batch(batch).unwrap();
    }
    fixture
        .products
        .lock()
        .await
        .insert(product_id, product);
    (product_id, batch_ids)
}

async fn remaining_of(fixture: &Fixture, product_id: ProductId, batch_id: BatchId) -> u32 {
    let products = fixture.products.lock().await;
    products
        .get(&product_id)
        .unwrap()
        .stock_batches()
        .iter()
        .find(|b| b.id() == batch_id)
        .unwrap()
        .remaining_quantity()
}

/// シナリオ: 商品"Widget"にバッチ（数量10、売価5.00）が1つある状態で
/// 10個の販売を作成すると、バッチは完全に空になり、合計は50.00、
/// ゲートウェイのinitializeは金額5000コボ・該当メールで1回だけ呼ばれる
#[tokio::test]
async fn test_create_sale_drains_batch_and_initializes_payment() {
    let fixture = build_fixture(StubPaymentGateway::new());
    let (product_id, batch_ids) = seed_product(&fixture, "Widget", vec![(10, 500, 1)]).await;

    let customer_id = CustomerId::new();
    let receipt = fixture
        .service
        .create_sale(
            customer_id,
            "a@b.com",
            &[CheckoutLine {
                product_id,
                quantity: 10,
            }],
        )
        .await
        .unwrap();

    // 合計は 10 × 5.00 = 50.00（5000コボ）
    assert_eq!(receipt.total_amount.kobo(), 5000);
    assert!(!receipt.authorization_url.is_empty());
    assert!(!receipt.access_code.is_empty());

    // initializeは1回だけ、変換済みの最小単位金額とメールで呼ばれる
    assert_eq!(fixture.gateway.init_call_count().await, 1);
    let calls = fixture.gateway.init_calls.lock().await;
    assert_eq!(calls[0], ("a@b.com".to_string(), 5000));
    drop(calls);

    // バッチは完全に引き落とされている
    assert_eq!(remaining_of(&fixture, product_id, batch_ids[0]).await, 0);

    // 販売は未払いで永続化され、参照が一致する
    let sales = fixture.sales.lock().await;
    let sale = sales.get(&receipt.sale_id).unwrap();
    assert!(!sale.paid());
    assert_eq!(sale.payment_reference(), receipt.reference);
    assert_eq!(sale.customer_id(), customer_id);
    assert_eq!(sale.items().len(), 1);
}

/// FIFO順: 古いバッチ（数量3）と新しいバッチ（数量5）に対する4個の要求は
/// 古いバッチから3個、新しいバッチから1個をこの順で引き当てる
#[tokio::test]
async fn test_create_sale_fifo_across_batches() {
    let fixture = build_fixture(StubPaymentGateway::new());
    let (product_id, batch_ids) =
        seed_product(&fixture, "Widget", vec![(3, 1000, 10), (5, 1250, 1)]).await;

    let receipt = fixture
        .service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[CheckoutLine {
                product_id,
                quantity: 4,
            }],
        )
        .await
        .unwrap();

    // 合計は 3 × 10.00 + 1 × 12.50 = 42.50
    assert_eq!(receipt.total_amount.kobo(), 4250);

    assert_eq!(remaining_of(&fixture, product_id, batch_ids[0]).await, 0);
    assert_eq!(remaining_of(&fixture, product_id, batch_ids[1]).await, 4);

    // 明細はバッチごとの歴史的価格を保持する
    let sales = fixture.sales.lock().await;
    let sale = sales.get(&receipt.sale_id).unwrap();
    assert_eq!(sale.items().len(), 2);
    assert_eq!(sale.items()[0].quantity(), 3);
    assert_eq!(sale.items()[0].sale_price().kobo(), 1000);
    assert_eq!(sale.items()[1].quantity(), 1);
    assert_eq!(sale.items()[1].sale_price().kobo(), 1250);
}

/// シナリオ: 残数 (2, 2) のバッチに対する5個の要求は
/// InsufficientStock{requested:5, available:4} で失敗し、どのバッチも変化しない
#[tokio::test]
async fn test_create_sale_insufficient_stock_mutates_nothing() {
    let fixture = build_fixture(StubPaymentGateway::new());
    let (product_id, batch_ids) =
        seed_product(&fixture, "Widget", vec![(2, 1000, 10), (2, 1000, 1)]).await;

    let result = fixture
        .service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[CheckoutLine {
                product_id,
                quantity: 5,
            }],
        )
        .await;

    match result {
        Err(ApplicationError::DomainError(DomainError::InsufficientStock {
            product_id: reported,
            requested,
            available,
        })) => {
            assert_eq!(reported, product_id);
            assert_eq!(requested, 5);
            assert_eq!(available, 4);
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.reference)),
    }

    // 在庫は変化せず、ゲートウェイは呼ばれず、販売も作成されない
    assert_eq!(remaining_of(&fixture, product_id, batch_ids[0]).await, 2);
    assert_eq!(remaining_of(&fixture, product_id, batch_ids[1]).await, 2);
    assert_eq!(fixture.gateway.init_call_count().await, 0);
    assert!(fixture.sales.lock().await.is_empty());
}

/// 未知の商品IDはゲートウェイ呼び出しも書き込みも行わず拒否される
#[tokio::test]
async fn test_create_sale_unknown_product_rejected() {
    let fixture = build_fixture(StubPaymentGateway::new());
    let unknown = ProductId::new();

    let result = fixture
        .service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[CheckoutLine {
                product_id: unknown,
                quantity: 1,
            }],
        )
        .await;

    match result {
        Err(ApplicationError::DomainError(DomainError::UnknownProduct(reported))) => {
            assert_eq!(reported, unknown);
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.reference)),
    }
    assert_eq!(fixture.gateway.init_call_count().await, 0);
    assert!(fixture.sales.lock().await.is_empty());
}

/// 明細のいずれかが在庫不足なら、販売全体が失敗し何も書き込まれない
#[tokio::test]
async fn test_create_sale_is_all_or_nothing_across_lines() {
    let fixture = build_fixture(StubPaymentGateway::new());
    let (product_a, batches_a) = seed_product(&fixture, "Widget", vec![(10, 500, 1)]).await;
    let (product_b, batches_b) = seed_product(&fixture, "Gadget", vec![(1, 700, 1)]).await;

    let result = fixture
        .service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[
                CheckoutLine {
                    product_id: product_a,
                    quantity: 5,
                },
                CheckoutLine {
                    product_id: product_b,
                    quantity: 3,
                },
            ],
        )
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::DomainError(
            DomainError::InsufficientStock { .. }
        ))
    ));

    // 1行目が引当可能でも、2行目の失敗で全体が中止され在庫は変化しない
    assert_eq!(remaining_of(&fixture, product_a, batches_a[0]).await, 10);
    assert_eq!(remaining_of(&fixture, product_b, batches_b[0]).await, 1);
    assert_eq!(fixture.gateway.init_call_count().await, 0);
    assert!(fixture.sales.lock().await.is_empty());
}

/// 同一リクエスト内に同じ商品が複数回現れても、同じ在庫を二重に引き当てない
#[tokio::test]
async fn test_create_sale_duplicate_lines_share_snapshot() {
    let fixture = build_fixture(StubPaymentGateway::new());
    let (product_id, _) = seed_product(&fixture, "Widget", vec![(4, 500, 1)]).await;

    // 3 + 2 = 5 > 4 のため、2行目の引当で在庫不足になる必要がある
    let result = fixture
        .service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[
                CheckoutLine {
                    product_id,
                    quantity: 3,
                },
                CheckoutLine {
                    product_id,
                    quantity: 2,
                },
            ],
        )
        .await;

    match result {
        Err(ApplicationError::DomainError(DomainError::InsufficientStock {
            requested,
            available,
            ..
        })) => {
            assert_eq!(requested, 2);
            assert_eq!(available, 1);
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.reference)),
    }
    assert!(fixture.sales.lock().await.is_empty());
}

/// 同一リクエスト内の重複明細でも合計が在庫内に収まれば成功する
#[tokio::test]
async fn test_create_sale_duplicate_lines_within_stock() {
    let fixture = build_fixture(StubPaymentGateway::new());
    let (product_id, batch_ids) = seed_product(&fixture, "Widget", vec![(5, 500, 1)]).await;

    let receipt = fixture
        .service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[
                CheckoutLine {
                    product_id,
                    quantity: 3,
                },
                CheckoutLine {
                    product_id,
                    quantity: 2,
                },
            ],
        )
        .await
        .unwrap();

    assert_eq!(receipt.total_amount.kobo(), 2500);
    assert_eq!(remaining_of(&fixture, product_id, batch_ids[0]).await, 0);
}

/// ゲートウェイの初期化失敗時は何も書き込まれない
/// （在庫は減算されず、販売も作成されない）
#[tokio::test]
async fn test_create_sale_gateway_failure_writes_nothing() {
    let fixture = build_fixture(StubPaymentGateway::failing_initialize());
    let (product_id, batch_ids) = seed_product(&fixture, "Widget", vec![(10, 500, 1)]).await;

    let result = fixture
        .service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[CheckoutLine {
                product_id,
                quantity: 2,
            }],
        )
        .await;

    assert!(matches!(result, Err(ApplicationError::GatewayError(_))));
    assert_eq!(remaining_of(&fixture, product_id, batch_ids[0]).await, 10);
    assert!(fixture.sales.lock().await.is_empty());
}

/// 永続化の競合（比較交換の不成立）はConflictとして呼び出し側へ返る
#[tokio::test]
async fn test_create_sale_stock_conflict_surfaces() {
    let products = Arc::new(Mutex::new(HashMap::new()));
    let sales: Arc<Mutex<HashMap<SaleId, Sale>>> = Arc::new(Mutex::new(HashMap::new()));
    let gateway = Arc::new(StubPaymentGateway::new());
    let service = CheckoutService::new(
        Arc::new(MockProductRepository::new(products.clone())),
        Arc::new(MockSaleRepository::new(sales.clone(), products.clone()).with_conflict()),
        gateway.clone(),
        Arc::new(ConsoleLogger::new()),
    );

    let product_id = ProductId::new();
    let mut product = Product::new(product_id, "Widget".to_string(), None, None).unwrap();
    product
        .add_batch(
            StockBatch::new(
                BatchId::new(),
                product_id,
                10,
                Money::from_kobo(250),
                Money::from_kobo(500),
                Utc::now(),
            )
            .unwrap(),
        )
        .unwrap();
    products.lock().await.insert(product_id, product);

    let result = service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[CheckoutLine {
                product_id,
                quantity: 2,
            }],
        )
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::RepositoryError(
            RepositoryError::Conflict(_)
        ))
    ));
    assert!(sales.lock().await.is_empty());
}

/// 検証成功で販売が支払済みに確定する
#[tokio::test]
async fn test_verify_payment_finalizes_sale() {
    let fixture = build_fixture(StubPaymentGateway::new());
    let (product_id, _) = seed_product(&fixture, "Widget", vec![(10, 500, 1)]).await;

    let receipt = fixture
        .service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[CheckoutLine {
                product_id,
                quantity: 2,
            }],
        )
        .await
        .unwrap();

    let outcome = fixture
        .service
        .verify_payment(&receipt.reference)
        .await
        .unwrap();

    assert_eq!(outcome.sale_id, receipt.sale_id);
    assert_eq!(outcome.payment_status, "success");
    assert_eq!(fixture.gateway.verify_call_count().await, 1);

    let sales = fixture.sales.lock().await;
    assert!(sales.get(&receipt.sale_id).unwrap().paid());
}

/// 冪等性: 支払済みの販売への再検証は同じ成功を返し、
/// ゲートウェイのverifyを再度呼ばない
#[tokio::test]
async fn test_verify_payment_is_idempotent() {
    let fixture = build_fixture(StubPaymentGateway::new());
    let (product_id, _) = seed_product(&fixture, "Widget", vec![(10, 500, 1)]).await;

    let receipt = fixture
        .service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[CheckoutLine {
                product_id,
                quantity: 2,
            }],
        )
        .await
        .unwrap();

    let first = fixture
        .service
        .verify_payment(&receipt.reference)
        .await
        .unwrap();
    assert_eq!(fixture.gateway.verify_call_count().await, 1);

    // 2回目はゲートウェイを呼ばずに同じ成功を返す
    let second = fixture
        .service
        .verify_payment(&receipt.reference)
        .await
        .unwrap();
    assert_eq!(fixture.gateway.verify_call_count().await, 1);
    assert_eq!(second.sale_id, first.sale_id);
    assert_eq!(second.payment_status, "success");

    // 支払済みフラグは変化しない
    let sales = fixture.sales.lock().await;
    assert!(sales.get(&receipt.sale_id).unwrap().paid());
}

/// 未知の決済参照は拒否され、何も変更されない
#[tokio::test]
async fn test_verify_payment_unknown_reference() {
    let fixture = build_fixture(StubPaymentGateway::new());

    let result = fixture.service.verify_payment("no-such-ref").await;

    match result {
        Err(ApplicationError::DomainError(DomainError::UnknownSaleReference(reference))) => {
            assert_eq!(reference, "no-such-ref");
        }
        other => panic!("unexpected result: {:?}", other.map(|o| o.payment_status)),
    }
    // 参照が見つからない場合、ゲートウェイのverifyは呼ばれない
    assert_eq!(fixture.gateway.verify_call_count().await, 0);
}

/// 検証のゲートウェイ失敗では販売は未払いのまま残り、再試行できる
#[tokio::test]
async fn test_verify_payment_gateway_failure_keeps_sale_pending() {
    let fixture = build_fixture(StubPaymentGateway::failing_verify());
    let (product_id, _) = seed_product(&fixture, "Widget", vec![(10, 500, 1)]).await;

    let receipt = fixture
        .service
        .create_sale(
            CustomerId::new(),
            "a@b.com",
            &[CheckoutLine {
                product_id,
                quantity: 2,
            }],
        )
        .await
        .unwrap();

    let result = fixture.service.verify_payment(&receipt.reference).await;
    assert!(matches!(result, Err(ApplicationError::GatewayError(_))));

    let sales = fixture.sales.lock().await;
    assert!(!sales.get(&receipt.sale_id).unwrap().paid());
}

/// 空の明細は検証エラーになり、ゲートウェイは呼ばれない
#[tokio::test]
async fn test_create_sale_empty_lines_rejected() {
    let fixture = build_fixture(StubPaymentGateway::new());

    let result = fixture
        .service
        .create_sale(CustomerId::new(), "a@b.com", &[])
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::DomainError(DomainError::SaleValidation(_)))
    ));
    assert_eq!(fixture.gateway.init_call_count().await, 0);
}
