// アプリケーションサービス
// ポート経由でドメインロジックと外部コラボレーターを調停する

pub mod catalog_service;
pub mod checkout_service;
pub mod report_service;

pub use catalog_service::CatalogService;
pub use checkout_service::{CheckoutLine, CheckoutReceipt, CheckoutService, VerificationOutcome};
pub use report_service::{ProfitLossReport, ReportService};
