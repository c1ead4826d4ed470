use crate::config::MidtransConfig;
use crate::error::{AppError, AppResult};
use crate::utils::order_status::GatewayOutcome;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use utoipa::ToSchema;

const SNAP_SANDBOX_URL: &str = "https://app.sandbox.midtrans.com";
const SNAP_PRODUCTION_URL: &str = "https://app.midtrans.com";
const API_SANDBOX_URL: &str = "https://api.sandbox.midtrans.com";
const API_PRODUCTION_URL: &str = "https://api.midtrans.com";

// Snap rejects item names longer than this
const ITEM_NAME_MAX: usize = 50;

#[derive(Debug, Serialize)]
pub struct SnapTransactionRequest {
    pub transaction_details: TransactionDetails,
    pub item_details: Vec<ItemDetail>,
    pub customer_details: CustomerDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<SnapCallbacks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<SnapExpiry>,
}

#[derive(Debug, Serialize)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Debug, Serialize)]
pub struct ItemDetail {
    pub id: String,
    pub price: i64,
    pub quantity: i32,
    pub name: String,
}

impl ItemDetail {
    pub fn new(id: impl Into<String>, price: i64, quantity: i32, name: &str) -> Self {
        Self {
            id: id.into(),
            price,
            quantity,
            name: name.chars().take(ITEM_NAME_MAX).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct SnapCallbacks {
    pub finish: String,
}

/// Payment window, counted by Midtrans from transaction creation.
#[derive(Debug, Serialize, PartialEq)]
pub struct SnapExpiry {
    pub unit: &'static str,
    pub duration: i64,
}

impl SnapExpiry {
    pub fn minutes(duration: i64) -> Self {
        Self {
            unit: "minute",
            duration,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SnapTransaction {
    pub token: String,
    pub redirect_url: String,
}

/// HTTP notification body; the status API returns the same shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MidtransNotification {
    pub order_id: String,
    pub status_code: String,
    pub gross_amount: String,
    #[serde(default)]
    pub signature_key: Option<String>,
    pub transaction_status: String,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl MidtransNotification {
    pub fn outcome(&self) -> Option<GatewayOutcome> {
        outcome_of(&self.transaction_status, self.fraud_status.as_deref())
    }
}

/// Maps Midtrans `transaction_status` / `fraud_status` onto a gateway outcome.
/// Unknown statuses (e.g. `refund`, `authorize`) return `None`.
pub fn outcome_of(transaction_status: &str, fraud_status: Option<&str>) -> Option<GatewayOutcome> {
    match transaction_status {
        "capture" => match fraud_status {
            Some("challenge") => Some(GatewayOutcome::Pending),
            Some("deny") => Some(GatewayOutcome::Failed),
            _ => Some(GatewayOutcome::Settled),
        },
        "settlement" => Some(GatewayOutcome::Settled),
        "pending" => Some(GatewayOutcome::Pending),
        "deny" => Some(GatewayOutcome::Failed),
        "failure" => Some(GatewayOutcome::Failed),
        "cancel" => Some(GatewayOutcome::Cancelled),
        "expire" => Some(GatewayOutcome::Expired),
        _ => None,
    }
}

/// `SHA512(order_id + status_code + gross_amount + server_key)`, hex encoded.
pub fn signature_key(order_id: &str, status_code: &str, gross_amount: &str, server_key: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Midtrans reports amounts as decimal strings ("15000.00"); Rupiah has no
/// minor unit so any fraction must be zero.
pub fn parse_gross_amount(raw: &str) -> AppResult<i64> {
    let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
    if !frac.chars().all(|c| c == '0') {
        return Err(AppError::ValidationError(format!(
            "Unexpected fractional gross amount: {raw}"
        )));
    }
    whole
        .parse::<i64>()
        .map_err(|_| AppError::ValidationError(format!("Invalid gross amount: {raw}")))
}

#[derive(Clone)]
pub struct MidtransService {
    client: Client,
    config: MidtransConfig,
}

impl MidtransService {
    pub fn new(config: MidtransConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.server_key.is_empty()
    }

    fn snap_base_url(&self) -> &str {
        match &self.config.snap_base_url {
            Some(url) => url.trim_end_matches('/'),
            None if self.config.is_production => SNAP_PRODUCTION_URL,
            None => SNAP_SANDBOX_URL,
        }
    }

    fn api_base_url(&self) -> &str {
        match &self.config.api_base_url {
            Some(url) => url.trim_end_matches('/'),
            None if self.config.is_production => API_PRODUCTION_URL,
            None => API_SANDBOX_URL,
        }
    }

    pub fn finish_callback(&self) -> Option<SnapCallbacks> {
        self.config
            .finish_redirect_url
            .clone()
            .map(|finish| SnapCallbacks { finish })
    }

    pub async fn create_snap_transaction(
        &self,
        request: &SnapTransactionRequest,
    ) -> AppResult<SnapTransaction> {
        if !self.is_enabled() {
            return Err(AppError::ConfigError(
                "Midtrans server key is not configured".to_string(),
            ));
        }

        let url = format!("{}/snap/v1/transactions", self.snap_base_url());
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.server_key, Some(""))
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        if response.status().is_success() {
            let snap: SnapTransaction = response.json().await?;
            log::info!(
                "Created Snap transaction for order {}",
                request.transaction_details.order_id
            );
            Ok(snap)
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Failed to create Snap transaction (HTTP {}): {}",
                status.as_u16(),
                error_text
            )))
        }
    }

    pub async fn get_transaction_status(&self, order_id: &str) -> AppResult<MidtransNotification> {
        if !self.is_enabled() {
            return Err(AppError::ConfigError(
                "Midtrans server key is not configured".to_string(),
            ));
        }

        let url = format!("{}/v2/{}/status", self.api_base_url(), order_id);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.server_key, Some(""))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Failed to fetch transaction status (HTTP {}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: serde_json::Value = response.json().await?;
        // unknown transactions come back as HTTP 200 with status_code 404
        if body.get("status_code").and_then(|v| v.as_str()) == Some("404") {
            return Err(AppError::NotFound(format!(
                "Transaction {order_id} not found at gateway"
            )));
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Closes a still-pending transaction so it can no longer be paid.
    pub async fn cancel_transaction(&self, order_id: &str) -> AppResult<()> {
        if !self.is_enabled() {
            return Err(AppError::ConfigError(
                "Midtrans server key is not configured".to_string(),
            ));
        }

        let url = format!("{}/v2/{}/cancel", self.api_base_url(), order_id);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.server_key, Some(""))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;
        // Midtrans reports the outcome in the body; 412 means the transaction
        // is no longer cancellable (e.g. settled meanwhile)
        match body.get("status_code").and_then(|v| v.as_str()) {
            Some("200") if status.is_success() => {
                log::info!("Cancelled Midtrans transaction {order_id}");
                Ok(())
            }
            code => Err(AppError::ExternalApiError(format!(
                "Failed to cancel transaction {order_id} (HTTP {}, status_code {}): {}",
                status.as_u16(),
                code.unwrap_or("-"),
                body.get("status_message").and_then(|v| v.as_str()).unwrap_or("unknown error")
            ))),
        }
    }

    pub fn verify_signature(&self, notification: &MidtransNotification) -> AppResult<()> {
        let provided = notification
            .signature_key
            .as_deref()
            .ok_or_else(|| AppError::AuthError("Missing notification signature".to_string()))?;

        let expected = signature_key(
            &notification.order_id,
            &notification.status_code,
            &notification.gross_amount,
            &self.config.server_key,
        );

        if !expected.eq_ignore_ascii_case(provided) {
            return Err(AppError::AuthError(
                "Invalid notification signature".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MidtransService {
        MidtransService::new(MidtransConfig {
            server_key: "SB-Mid-server-test".to_string(),
            ..Default::default()
        })
    }

    fn notification(signature: Option<String>) -> MidtransNotification {
        MidtransNotification {
            order_id: "GMS-20250901-abc".to_string(),
            status_code: "200".to_string(),
            gross_amount: "30000.00".to_string(),
            signature_key: signature,
            transaction_status: "settlement".to_string(),
            fraud_status: Some("accept".to_string()),
            payment_type: Some("qris".to_string()),
            transaction_id: Some("tx-1".to_string()),
        }
    }

    #[test]
    fn test_signature_is_sha512_hex() {
        let sig = signature_key("a", "200", "1.00", "key");
        assert_eq!(sig.len(), 128);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(sig, signature_key("a", "201", "1.00", "key"));
    }

    #[test]
    fn test_verify_signature() {
        let svc = service();
        let good = signature_key("GMS-20250901-abc", "200", "30000.00", "SB-Mid-server-test");
        assert!(svc.verify_signature(&notification(Some(good.clone()))).is_ok());
        assert!(
            svc.verify_signature(&notification(Some(good.to_uppercase())))
                .is_ok()
        );
        assert!(svc.verify_signature(&notification(Some("deadbeef".into()))).is_err());
        assert!(svc.verify_signature(&notification(None)).is_err());

        let mut tampered = notification(Some(good));
        tampered.gross_amount = "1.00".to_string();
        assert!(svc.verify_signature(&tampered).is_err());
    }

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(outcome_of("capture", Some("accept")), Some(GatewayOutcome::Settled));
        assert_eq!(outcome_of("capture", None), Some(GatewayOutcome::Settled));
        assert_eq!(outcome_of("capture", Some("challenge")), Some(GatewayOutcome::Pending));
        assert_eq!(outcome_of("settlement", None), Some(GatewayOutcome::Settled));
        assert_eq!(outcome_of("pending", None), Some(GatewayOutcome::Pending));
        assert_eq!(outcome_of("deny", None), Some(GatewayOutcome::Failed));
        assert_eq!(outcome_of("failure", None), Some(GatewayOutcome::Failed));
        assert_eq!(outcome_of("cancel", None), Some(GatewayOutcome::Cancelled));
        assert_eq!(outcome_of("expire", None), Some(GatewayOutcome::Expired));
        assert_eq!(outcome_of("refund", None), None);
    }

    #[test]
    fn test_parse_gross_amount() {
        assert_eq!(parse_gross_amount("30000.00").unwrap(), 30000);
        assert_eq!(parse_gross_amount("30000").unwrap(), 30000);
        assert!(parse_gross_amount("30000.50").is_err());
        assert!(parse_gross_amount("abc").is_err());
    }

    #[test]
    fn test_base_urls() {
        let svc = service();
        assert_eq!(svc.snap_base_url(), SNAP_SANDBOX_URL);
        assert_eq!(svc.api_base_url(), API_SANDBOX_URL);

        let prod = MidtransService::new(MidtransConfig {
            server_key: "k".into(),
            is_production: true,
            snap_base_url: Some("http://localhost:9999/".into()),
            ..Default::default()
        });
        assert_eq!(prod.snap_base_url(), "http://localhost:9999");
        assert_eq!(prod.api_base_url(), API_PRODUCTION_URL);
    }

    #[test]
    fn test_item_name_is_truncated() {
        let item = ItemDetail::new("1", 1000, 1, &"x".repeat(80));
        assert_eq!(item.name.chars().count(), ITEM_NAME_MAX);
    }

    #[test]
    fn test_snap_request_serialization() {
        let req = SnapTransactionRequest {
            transaction_details: TransactionDetails {
                order_id: "GMS-1".into(),
                gross_amount: 30000,
            },
            item_details: vec![ItemDetail::new("7", 15000, 2, "Nasi Goreng")],
            customer_details: CustomerDetails {
                first_name: "Budi".into(),
                email: "budi@example.com".into(),
                phone: "081234567890".into(),
            },
            callbacks: None,
            expiry: Some(SnapExpiry::minutes(60)),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["transaction_details"]["gross_amount"], 30000);
        assert!(value.get("callbacks").is_none());
        assert_eq!(value["expiry"]["unit"], "minute");
        assert_eq!(value["expiry"]["duration"], 60);
    }
}
