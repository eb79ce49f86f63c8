// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{BatchId, Money, Product, ProductId, Sale, SaleId, StockBatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryError {
    /// データベース接続に失敗
    ConnectionFailed(String),
    /// 操作に失敗
    OperationFailed(String),
    /// データの取得に失敗
    FetchFailed(String),
    /// 楽観的同時実行制御の競合（在庫減算の条件付きUPDATEが不成立）
    Conflict(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RepositoryError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
            RepositoryError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
            RepositoryError::Conflict(msg) => write!(f, "Concurrent update conflict: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// 商品リポジトリトレイト
/// 商品集約（在庫バッチを含む）の永続化を抽象化する
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 商品を保存する
    ///
    /// # Arguments
    /// * `product` - 保存する商品
    ///
    /// # Returns
    /// * `Ok(())` - 保存成功
    /// * `Err(RepositoryError)` - 保存失敗（商品名の重複を含む）
    async fn create(&self, product: &Product) -> Result<(), RepositoryError>;

    /// 商品の説明と画像参照を更新する
    ///
    /// # Returns
    /// * `Ok(Some(Product))` - 更新後の商品
    /// * `Ok(None)` - 商品が見つからなかった
    async fn update_details(
        &self,
        product_id: ProductId,
        description: Option<String>,
        image: Option<String>,
    ) -> Result<Option<Product>, RepositoryError>;

    /// 商品IDで商品を検索する（在庫バッチ込み）
    ///
    /// # Returns
    /// * `Ok(Some(Product))` - 商品が見つかった
    /// * `Ok(None)` - 商品が見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(&self, product_id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// 商品名で商品を検索する（在庫バッチ込み）
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError>;

    /// すべての商品を取得する
    /// 商品名の昇順で並べて返す
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// 新しい一意の商品IDを生成する
    fn next_identity(&self) -> ProductId;
}

/// 在庫バッチリポジトリトレイト
/// 入荷・価格調整・照会を抽象化する
/// 販売に伴う残数量の減算はSaleRepositoryの決済トランザクションが行う
#[async_trait]
pub trait StockBatchRepository: Send + Sync {
    /// 在庫バッチを保存する（入荷）
    async fn create(&self, batch: &StockBatch) -> Result<(), RepositoryError>;

    /// バッチの原価・売価を変更する
    ///
    /// # Returns
    /// * `Ok(Some(StockBatch))` - 変更後のバッチ
    /// * `Ok(None)` - バッチが見つからなかった
    async fn reprice(
        &self,
        batch_id: BatchId,
        cost_price: Money,
        selling_price: Money,
    ) -> Result<Option<StockBatch>, RepositoryError>;

    /// バッチIDでバッチを検索する
    async fn find_by_id(&self, batch_id: BatchId) -> Result<Option<StockBatch>, RepositoryError>;

    /// すべての在庫バッチを取得する
    /// 入荷日時の昇順で並べて返す
    async fn find_all(&self) -> Result<Vec<StockBatch>, RepositoryError>;

    /// 新しい一意のバッチIDを生成する
    fn next_identity(&self) -> BatchId;
}

/// 在庫減算指示
/// 決済トランザクション内で適用する (バッチ, 引落数量) の組
#[derive(Debug, Clone, PartialEq)]
pub struct StockDecrement {
    pub batch_id: BatchId,
    pub quantity: u32,
}

/// 販売リポジトリトレイト
/// 販売集約の永続化と決済の確定を抽象化する
#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// 未払いの販売とその在庫減算を1つのトランザクションで永続化する
    /// 減算は `remaining_quantity >= 引落数量` を条件とする比較交換で行い、
    /// いずれかのバッチで不成立の場合は全体をロールバックして
    /// `RepositoryError::Conflict` を返す
    ///
    /// # Arguments
    /// * `sale` - 保存する販売（paid=false）
    /// * `decrements` - 引当結果から計算した在庫減算のリスト
    async fn create_with_decrements(
        &self,
        sale: &Sale,
        decrements: &[StockDecrement],
    ) -> Result<(), RepositoryError>;

    /// 決済参照で販売を検索する（明細込み）
    ///
    /// # Returns
    /// * `Ok(Some(Sale))` - 販売が見つかった
    /// * `Ok(None)` - 販売が見つからなかった
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Sale>, RepositoryError>;

    /// 販売を支払済みにマークする（`paid = false` の場合のみ、比較交換）
    ///
    /// # Returns
    /// * `Ok(true)` - この呼び出しで支払済みに遷移した
    /// * `Ok(false)` - 既に支払済みだった（並行検証との競合を含む）
    async fn mark_paid(&self, sale_id: SaleId) -> Result<bool, RepositoryError>;

    /// 新しい一意の販売IDを生成する
    fn next_identity(&self) -> SaleId;
}

/// レポートリポジトリトレイト
/// 支払済み販売に対する集計クエリを抽象化する
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// 期間内の支払済み販売の合計金額を取得する
    async fn total_sales(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Money, RepositoryError>;

    /// 期間内の支払済み販売の (売上, 原価) を取得する
    async fn profit_loss(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(Money, Money), RepositoryError>;

    /// (支払済み件数, 未払い件数) を取得する
    async fn sales_status_counts(&self) -> Result<(u64, u64), RepositoryError>;
}

/// 決済ゲートウェイエラー
/// リモート障害は即時に失敗として呼び出し側へ返す（アダプターは再試行しない）
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// リクエストの送信に失敗（接続エラー・タイムアウト）
    #[error("Gateway request failed: {0}")]
    RequestFailed(String),
    /// ゲートウェイが拒否（非2xx応答）
    #[error("Gateway rejected the request: status {status}")]
    Rejected { status: u16, body: String },
    /// 応答の形式が不正
    #[error("Gateway returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// 決済初期化の結果
/// ゲートウェイが発行するリダイレクトURL・アクセスコード・参照
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInit {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// 決済検証の結果
/// ゲートウェイが報告したステータス文字列と生の応答ペイロード
#[derive(Debug, Clone)]
pub struct PaymentVerification {
    pub status: String,
    pub raw: serde_json::Value,
}

/// 決済ゲートウェイトレイト
/// 外部決済プロバイダーとの2段階のやり取り（初期化・検証）を抽象化する
/// 金額の最小通貨単位への変換は呼び出し側の責務
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 取引を初期化し、リダイレクト情報と決済参照を取得する
    ///
    /// # Arguments
    /// * `email` - 顧客のメールアドレス
    /// * `amount_kobo` - 金額（コボ、最小通貨単位）
    async fn initialize(&self, email: &str, amount_kobo: i64)
        -> Result<PaymentInit, GatewayError>;

    /// 決済参照で取引を検証する
    async fn verify(&self, reference: &str) -> Result<PaymentVerification, GatewayError>;
}
