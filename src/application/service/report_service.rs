use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::Money;
use crate::domain::port::ReportRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 損益レポート
#[derive(Debug, Clone)]
pub struct ProfitLossReport {
    pub revenue: Money,
    pub cost: Money,
    pub profit: Money,
}

/// レポートアプリケーションサービス
/// 支払済み販売に対する読み取り専用の集計を提供する
pub struct ReportService {
    report_repository: Arc<dyn ReportRepository>,
}

impl ReportService {
    /// 新しいレポートサービスを作成
    ///
    /// # Arguments
    /// * `report_repository` - レポートリポジトリ
    pub fn new(report_repository: Arc<dyn ReportRepository>) -> Self {
        Self { report_repository }
    }

    fn validate_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ApplicationError> {
        if start > end {
            return Err(DomainError::InvalidValue(
                "開始日時は終了日時より前である必要があります".to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// 期間内の支払済み販売の合計金額を取得
    pub async fn total_sales(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Money, ApplicationError> {
        Self::validate_range(start, end)?;
        self.report_repository
            .total_sales(start, end)
            .await
            .map_err(ApplicationError::from)
    }

    /// 期間内の損益（売上・原価・利益）を取得
    pub async fn profit_loss(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ProfitLossReport, ApplicationError> {
        Self::validate_range(start, end)?;
        let (revenue, cost) = self.report_repository.profit_loss(start, end).await?;
        let profit = Money::from_kobo(revenue.kobo() - cost.kobo());
        Ok(ProfitLossReport {
            revenue,
            cost,
            profit,
        })
    }

    /// (支払済み件数, 未払い件数) を取得
    pub async fn sales_status_counts(&self) -> Result<(u64, u64), ApplicationError> {
        self.report_repository
            .sales_status_counts()
            .await
            .map_err(ApplicationError::from)
    }
}
