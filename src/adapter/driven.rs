// 駆動される側アダプター（リポジトリ実装・決済ゲートウェイ・ロガー）

mod console_logger;
mod paystack_gateway;
mod product_repository;
mod report_repository;
mod sale_repository;
mod stock_batch_repository;

pub use console_logger::ConsoleLogger;
pub use paystack_gateway::PaystackGateway;
pub use product_repository::MySqlProductRepository;
pub use report_repository::MySqlReportRepository;
pub use sale_repository::MySqlSaleRepository;
pub use stock_batch_repository::MySqlStockBatchRepository;
