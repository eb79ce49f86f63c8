use crate::adapter::database_config::PaystackConfig;
use crate::domain::port::{GatewayError, PaymentGateway, PaymentInit, PaymentVerification};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Paystack決済ゲートウェイアダプター
/// 取引の初期化と検証を行うHTTPクライアント
/// 再試行は行わない。失敗は即座に呼び出し側へ返す
pub struct PaystackGateway {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl PaystackGateway {
    /// 設定から新しいゲートウェイアダプターを作成
    /// トランスポートのタイムアウトは設定値（デフォルト10秒）で制限する
    ///
    /// # Arguments
    /// * `config` - Paystack設定（シークレットキー・ベースURL・タイムアウト）
    pub fn new(config: &PaystackConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GatewayError::RequestFailed(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            secret_key: config.secret_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 応答ボディの `data` オブジェクトを取り出す
    fn extract_data(payload: &Value) -> Result<&Value, GatewayError> {
        payload.get("data").ok_or_else(|| {
            GatewayError::InvalidResponse("応答に data フィールドがありません".to_string())
        })
    }

    /// `data` オブジェクトから文字列フィールドを取り出す
    fn extract_str(data: &Value, field: &str) -> Result<String, GatewayError> {
        data.get(field)
            .and_then(Value::as_str)
            .map(|s| s.to_string())
            .ok_or_else(|| {
                GatewayError::InvalidResponse(format!(
                    "応答に {} フィールドがありません",
                    field
                ))
            })
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("JSONの解析に失敗しました: {}", e)))
    }
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    async fn initialize(
        &self,
        email: &str,
        amount_kobo: i64,
    ) -> Result<PaymentInit, GatewayError> {
        let url = format!("{}/transaction/initialize", self.base_url);
        let payload = serde_json::json!({
            "email": email,
            "amount": amount_kobo,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let body = Self::read_json(response).await?;
        let data = Self::extract_data(&body)?;

        Ok(PaymentInit {
            authorization_url: Self::extract_str(data, "authorization_url")?,
            access_code: Self::extract_str(data, "access_code")?,
            reference: Self::extract_str(data, "reference")?,
        })
    }

    async fn verify(&self, reference: &str) -> Result<PaymentVerification, GatewayError> {
        let url = format!("{}/transaction/verify/{}", self.base_url, reference);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let body = Self::read_json(response).await?;
        let data = Self::extract_data(&body)?;
        let status = Self::extract_str(data, "status")?;

        Ok(PaymentVerification { status, raw: body })
    }
}
