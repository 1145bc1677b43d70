use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::models::Payment;

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("encoding provider request failed: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Authenticated HTTP client for the remittance provider. Every request is
/// signed; a single attempt is made per call, failures propagate to the
/// caller.
pub struct YellowCardClient {
    http: Client,
    base_url: String,
    api_key: String,
    secret_key: String,
}

impl YellowCardClient {
    pub fn new(cfg: &ProviderConfig) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(cfg.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
            secret_key: cfg.secret_key.clone(),
        }
    }

    /// Submits a payment. The serialized request bytes are signed and sent
    /// verbatim so the body hash in the signature matches what the
    /// provider receives.
    pub async fn submit_payment(&self, request: &PaymentRequest) -> Result<Payment, ProviderError> {
        self.post("/business/payments", request).await
    }

    pub async fn channels(&self) -> Result<Vec<Channel>, ProviderError> {
        let response: ChannelsResponse = self.get("/business/channels").await?;
        Ok(response.channels)
    }

    pub async fn networks(&self) -> Result<Vec<Network>, ProviderError> {
        let response: NetworksResponse = self.get("/business/networks").await?;
        Ok(response.networks)
    }

    pub async fn rates(&self) -> Result<Vec<Rate>, ProviderError> {
        let response: RatesResponse = self.get("/business/rates").await?;
        Ok(response.rates)
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ProviderError> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let signature = sign_request(&self.secret_key, &timestamp, path, Method::GET.as_str(), None);

        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("X-YC-Timestamp", &timestamp)
            .header(AUTHORIZATION, self.authorization(&signature))
            .send()
            .await?;

        self.read(response).await
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ProviderError> {
        let body_bytes = serde_json::to_vec(body)?;
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let signature = sign_request(
            &self.secret_key,
            &timestamp,
            path,
            Method::POST.as_str(),
            Some(&body_bytes),
        );

        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("X-YC-Timestamp", &timestamp)
            .header(AUTHORIZATION, self.authorization(&signature))
            .header(CONTENT_TYPE, "application/json")
            .body(body_bytes)
            .send()
            .await?;

        self.read(response).await
    }

    fn authorization(&self, signature: &str) -> String {
        format!("YcHmacV1 {}:{}", self.api_key, signature)
    }

    async fn read<R: DeserializeOwned>(&self, response: Response) -> Result<R, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }
        debug!(status = %status, "provider request succeeded");
        Ok(response.json::<R>().await?)
    }
}

/// HMAC-SHA256 over (timestamp, path, method) plus, for mutating calls, a
/// base64-encoded SHA-256 of the exact JSON body bytes; the result is
/// base64-encoded into the Authorization header.
fn sign_request(
    secret: &str,
    timestamp: &str,
    path: &str,
    method: &str,
    body: Option<&[u8]>,
) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts keys of any length");
    mac.update(timestamp.as_bytes());
    mac.update(path.as_bytes());
    mac.update(method.as_bytes());
    if let Some(bytes) = body {
        let body_hash = BASE64.encode(Sha256::digest(bytes));
        mac.update(body_hash.as_bytes());
    }
    BASE64.encode(mac.finalize().into_bytes())
}

/// Payment submission payload. Field names follow the provider's wire
/// format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub channel_id: String,
    pub sequence_id: String,
    pub local_amount: f64,
    pub reason: String,
    pub sender: RequestSender,
    pub destination: RequestDestination,
    pub force_accept: bool,
    pub customer_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSender {
    pub name: String,
    pub phone: String,
    pub country: String,
    pub address: String,
    pub dob: String,
    pub email: String,
    pub id_number: String,
    pub id_type: String,
    pub business_id: String,
    pub business_name: String,
    pub additional_id_type: String,
    pub additional_id_number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDestination {
    pub account_number: String,
    pub account_type: String,
    pub network_id: String,
    pub account_bank: String,
    pub network_name: String,
    pub country: String,
    pub account_name: String,
    pub phone_number: String,
}

/// Read-only provider resources exposed for diagnostics.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub channel_type: String,
    #[serde(default)]
    pub ramp_type: String,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub fee_local: f64,
    #[serde(default)]
    pub fee_usd: f64,
    #[serde(default)]
    pub vendor_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub account_number_type: String,
    #[serde(default)]
    pub channel_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub buy: f64,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub rate_id: String,
}

#[derive(Debug, Deserialize)]
struct ChannelsResponse {
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct NetworksResponse {
    #[serde(default)]
    networks: Vec<Network>,
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: Vec<Rate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "provider-secret";

    #[test]
    fn signature_is_deterministic_for_fixed_inputs() {
        let a = sign_request(SECRET, "2026-01-05T10:00:00Z", "/business/channels", "GET", None);
        let b = sign_request(SECRET, "2026-01-05T10:00:00Z", "/business/channels", "GET", None);
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn mutating_requests_include_the_body_hash() {
        let body = br#"{"sequenceId":"s1"}"#;
        let with_body = sign_request(SECRET, "2026-01-05T10:00:00Z", "/business/payments", "POST", Some(body));
        let without = sign_request(SECRET, "2026-01-05T10:00:00Z", "/business/payments", "POST", None);
        assert_ne!(with_body, without);
    }

    #[test]
    fn signature_covers_path_and_method() {
        let ts = "2026-01-05T10:00:00Z";
        let channels = sign_request(SECRET, ts, "/business/channels", "GET", None);
        let rates = sign_request(SECRET, ts, "/business/rates", "GET", None);
        assert_ne!(channels, rates);
    }

    #[test]
    fn payment_request_serializes_with_provider_field_names() {
        let request = PaymentRequest {
            channel_id: "chan-1".to_string(),
            sequence_id: "seq-1".to_string(),
            local_amount: 250_000.0,
            reason: "other".to_string(),
            sender: RequestSender {
                name: "Ada Obi".to_string(),
                phone: "+2348012345678".to_string(),
                country: "NG".to_string(),
                address: "12 Marina Rd".to_string(),
                dob: "1991-04-12".to_string(),
                email: "ada@example.com".to_string(),
                id_number: "A01234567".to_string(),
                id_type: "passport".to_string(),
                business_id: "B1234567".to_string(),
                business_name: "Example Inc.".to_string(),
                additional_id_type: String::new(),
                additional_id_number: String::new(),
            },
            destination: RequestDestination {
                account_number: "0123456789".to_string(),
                account_type: "bank".to_string(),
                network_id: "net-1".to_string(),
                account_bank: "Guaranty Trust Bank".to_string(),
                network_name: "Guaranty Trust Bank".to_string(),
                country: "NG".to_string(),
                account_name: "Ngozi Eze".to_string(),
                phone_number: "+2347011122233".to_string(),
            },
            force_accept: true,
            customer_type: "retail".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["channelId"], "chan-1");
        assert_eq!(json["sequenceId"], "seq-1");
        assert_eq!(json["localAmount"], 250_000.0);
        assert_eq!(json["sender"]["businessId"], "B1234567");
        assert_eq!(json["destination"]["accountNumber"], "0123456789");
        assert_eq!(json["forceAccept"], true);
    }
}
