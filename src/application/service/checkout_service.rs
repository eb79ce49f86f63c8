use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{CustomerId, Money, ProductId, Sale, SaleId, StockBatch};
use crate::domain::port::{
    Logger, PaymentGateway, ProductRepository, SaleRepository, StockDecrement,
};
use crate::domain::service;
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 販売作成要求の1明細
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// 販売作成の結果
/// 呼び出し元を決済ページへリダイレクトするための情報を含む
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub sale_id: SaleId,
    pub total_amount: Money,
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// 決済検証の結果
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub sale_id: SaleId,
    pub payment_status: String,
    pub message: String,
}

/// チェックアウトアプリケーションサービス（決済コーディネーター）
/// 引当 → 集計 → 決済初期化 → 原子的永続化 → （後続の）検証・確定 を調停する
/// 依存はすべてコンストラクタで注入し、グローバルな参照は行わない
pub struct CheckoutService {
    product_repository: Arc<dyn ProductRepository>,
    sale_repository: Arc<dyn SaleRepository>,
    payment_gateway: Arc<dyn PaymentGateway>,
    logger: Arc<dyn Logger>,
}

impl CheckoutService {
    /// 新しいチェックアウトサービスを作成
    ///
    /// # Arguments
    /// * `product_repository` - 商品リポジトリ
    /// * `sale_repository` - 販売リポジトリ
    /// * `payment_gateway` - 決済ゲートウェイ
    /// * `logger` - ロガー
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        sale_repository: Arc<dyn SaleRepository>,
        payment_gateway: Arc<dyn PaymentGateway>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            product_repository,
            sale_repository,
            payment_gateway,
            logger,
        }
    }

    /// 販売を作成する
    ///
    /// 1. 全明細をFIFO引当する（いずれかの明細が失敗したら何も書き込まない）
    /// 2. 合計金額を集計し、コボに変換してゲートウェイの決済を初期化する
    /// 3. 未払いの販売と在庫減算を1トランザクションで永続化する
    ///
    /// ゲートウェイが失敗した時点では何も書き込まれていないため、
    /// 在庫が減算されたまま課金されない状態は発生しない
    ///
    /// # Arguments
    /// * `customer_id` - 顧客ID（上流の認証レイヤーが付与）
    /// * `email` - 顧客のメールアドレス（同上）
    /// * `lines` - 要求明細（商品IDと数量の組、1件以上）
    pub async fn create_sale(
        &self,
        customer_id: CustomerId,
        email: &str,
        lines: &[CheckoutLine],
    ) -> Result<CheckoutReceipt, ApplicationError> {
        let correlation_id = Uuid::new_v4();

        if lines.is_empty() {
            return Err(DomainError::SaleValidation("販売明細が空です".to_string()).into());
        }

        // 商品ごとの在庫スナップショットの作業コピー
        // 同一リクエスト内に同じ商品が複数回現れても、引当済みの数量を
        // 二重に引き当てないよう、作業コピーへ減算を反映しながら進める
        let mut working: HashMap<ProductId, Vec<StockBatch>> = HashMap::new();
        let mut allocated_lines = Vec::new();
        let mut decrements: Vec<StockDecrement> = Vec::new();

        for line in lines {
            let batches = match working.entry(line.product_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let product = self
                        .product_repository
                        .find_by_id(line.product_id)
                        .await?
                        .ok_or(DomainError::UnknownProduct(line.product_id))?;
                    entry.insert(product.stock_batches().to_vec())
                }
            };

            let allocations = service::allocate(line.product_id, batches, line.quantity)?;

            for allocation in &allocations {
                if let Some(batch) = batches
                    .iter_mut()
                    .find(|batch| batch.id() == allocation.batch_id())
                {
                    batch.deduct(allocation.quantity())?;
                }
                decrements.push(StockDecrement {
                    batch_id: allocation.batch_id(),
                    quantity: allocation.quantity(),
                });
            }

            allocated_lines.push((line.product_id, allocations));
        }

        let (total, items) = service::aggregate(&allocated_lines)?;

        // 金額を最小通貨単位（コボ）でゲートウェイへ渡す
        let init = match self.payment_gateway.initialize(email, total.kobo()).await {
            Ok(init) => init,
            Err(err) => {
                self.logger.error(
                    "checkout",
                    &format!("決済の初期化に失敗しました: {}", err),
                    Some(correlation_id),
                    None,
                );
                return Err(ApplicationError::GatewayError(err));
            }
        };

        let sale = Sale::new(
            self.sale_repository.next_identity(),
            customer_id,
            Utc::now(),
            total,
            init.reference.clone(),
            items,
        )?;

        // 販売・明細・在庫減算を1トランザクションで永続化する
        // 減算の比較交換が不成立の場合は全体がロールバックされる
        if let Err(err) = self
            .sale_repository
            .create_with_decrements(&sale, &decrements)
            .await
        {
            self.logger.error(
                "checkout",
                &format!("販売 {} の永続化に失敗しました: {}", sale.id(), err),
                Some(correlation_id),
                None,
            );
            return Err(ApplicationError::RepositoryError(err));
        }

        self.logger.info(
            "checkout",
            &format!("販売 {} を作成しました（合計 {}）", sale.id(), total),
            Some(correlation_id),
            None,
        );

        Ok(CheckoutReceipt {
            sale_id: sale.id(),
            total_amount: total,
            authorization_url: init.authorization_url,
            access_code: init.access_code,
            reference: init.reference,
        })
    }

    /// 決済を検証し、販売を確定する
    ///
    /// 決済参照が冪等性の境界となる。既に支払済みの販売に対しては
    /// ゲートウェイを呼ばずに同じ成功を返す。確定は比較交換で行うため、
    /// 同一参照に対する並行検証でも確定は最大1回しか起こらない
    ///
    /// # Arguments
    /// * `reference` - ゲートウェイが発行した決済参照
    pub async fn verify_payment(
        &self,
        reference: &str,
    ) -> Result<VerificationOutcome, ApplicationError> {
        let correlation_id = Uuid::new_v4();

        let sale = self
            .sale_repository
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| DomainError::UnknownSaleReference(reference.to_string()))?;

        // 既に支払済みなら、ゲートウェイを呼ばずに同じ結果を返す
        if sale.paid() {
            self.logger.info(
                "checkout",
                &format!("販売 {} は既に検証済みです", sale.id()),
                Some(correlation_id),
                None,
            );
            return Ok(VerificationOutcome {
                sale_id: sale.id(),
                payment_status: "success".to_string(),
                message: "Payment has already been verified.".to_string(),
            });
        }

        let verification = match self.payment_gateway.verify(reference).await {
            Ok(verification) => verification,
            Err(err) => {
                // 検証に失敗しても販売はPendingのまま残り、呼び出し側が再試行できる
                self.logger.error(
                    "checkout",
                    &format!("決済の検証に失敗しました（参照: {}）: {}", reference, err),
                    Some(correlation_id),
                    None,
                );
                return Err(ApplicationError::GatewayError(err));
            }
        };

        let finalized = self.sale_repository.mark_paid(sale.id()).await?;
        if finalized {
            self.logger.info(
                "checkout",
                &format!("決済を検証し販売 {} を確定しました", sale.id()),
                Some(correlation_id),
                None,
            );
        } else {
            // 並行する検証が先に確定した。結果は同じ成功
            self.logger.info(
                "checkout",
                &format!("販売 {} は並行検証により確定済みでした", sale.id()),
                Some(correlation_id),
                None,
            );
        }

        Ok(VerificationOutcome {
            sale_id: sale.id(),
            payment_status: verification.status,
            message: "Payment successful and sale finalized.".to_string(),
        })
    }
}
