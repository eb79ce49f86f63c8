use retail_sales_management::adapter::driven::{
    ConsoleLogger, MySqlProductRepository, MySqlReportRepository, MySqlSaleRepository,
    MySqlStockBatchRepository, PaystackGateway,
};
use retail_sales_management::adapter::driver::rest_api::{create_router, AppStateInner};
use retail_sales_management::adapter::{DatabaseConfig, DatabaseMigration, PaystackConfig};
use retail_sales_management::application::service::{CatalogService, CheckoutService, ReportService};

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 在庫・販売管理システム REST API ===");
    println!();

    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    // データベース設定を読み込む
    let config = DatabaseConfig::from_env()?;
    println!(
        "データベース設定を読み込みました: {}:{}",
        config.host, config.port
    );

    // 決済ゲートウェイ設定を読み込む（シークレットキーは必須）
    let paystack_config = PaystackConfig::from_env()?;
    println!(
        "決済ゲートウェイ設定を読み込みました: {}",
        paystack_config.base_url
    );

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    println!("データベース接続プールを作成しました");

    // マイグレーションを実行
    let migration = DatabaseMigration::new(pool.clone());
    migration.run().await?;
    println!("データベースマイグレーションを実行しました");

    // MySQLリポジトリを作成
    let product_repository = Arc::new(MySqlProductRepository::new(pool.clone()));
    let stock_batch_repository = Arc::new(MySqlStockBatchRepository::new(pool.clone()));
    let sale_repository = Arc::new(MySqlSaleRepository::new(pool.clone()));
    let report_repository = Arc::new(MySqlReportRepository::new(pool.clone()));

    // 決済ゲートウェイアダプターとロガーを作成
    let payment_gateway = Arc::new(PaystackGateway::new(&paystack_config)?);
    let logger = Arc::new(ConsoleLogger::new());

    // アプリケーションサービスを作成（依存はすべてコンストラクタで注入）
    let checkout_service = CheckoutService::new(
        product_repository.clone(),
        sale_repository.clone(),
        payment_gateway,
        logger,
    );
    let catalog_service =
        CatalogService::new(product_repository.clone(), stock_batch_repository.clone());
    let report_service = ReportService::new(report_repository.clone());

    // アプリケーション状態を作成
    let app_state = AppStateInner {
        checkout_service: Arc::new(checkout_service),
        catalog_service: Arc::new(catalog_service),
        report_service: Arc::new(report_service),
    };

    // REST APIルーターを作成
    let app = create_router()
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // サーバーを起動
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("REST APIサーバーが起動しました: http://localhost:3000");
    println!("ヘルスチェック: GET http://localhost:3000/health");
    println!("API仕様:");
    println!("  POST /products - 商品作成");
    println!("  GET  /products - 商品一覧取得");
    println!("  GET  /products/:id - 商品詳細取得（在庫バッチ込み）");
    println!("  PUT  /products/:id - 商品更新（説明・画像）");
    println!("  POST /stock - 入荷（在庫バッチ作成）");
    println!("  GET  /stock - 在庫バッチ一覧取得");
    println!("  GET  /stock/:id - 在庫バッチ詳細取得");
    println!("  PUT  /stock/:id - 在庫バッチ価格変更");
    println!("  POST /sales - 販売作成（FIFO引当 + 決済初期化）");
    println!("  GET  /sales/verify/:reference - 決済検証");
    println!("  GET  /reports/total-sales - 売上合計レポート");
    println!("  GET  /reports/profit-loss - 損益レポート");
    println!("  GET  /reports/sales-status - 販売状況件数レポート");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
