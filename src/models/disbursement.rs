use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states of a disbursement. Records are created as
/// `processing`; webhook events move them to pending, failed or complete.
pub mod status {
    pub const PROCESSING: &str = "processing";
}

/// Sender block of the provider's payment resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParty {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub id_type: String,
}

/// Destination block of the provider's payment resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDestination {
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub network_id: String,
}

/// Value-type snapshot of the provider's payment resource, returned at
/// submission time and embedded by copy in the disbursement record.
/// Never updated after creation; only the parent's status field is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub channel_id: String,
    /// Caller-generated correlation key; webhook callbacks are matched to
    /// their disbursement through this value.
    #[serde(default)]
    pub sequence_id: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub converted_amount: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub sender: PaymentParty,
    #[serde(default)]
    pub destination: PaymentDestination,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub expires_at: String,
}

/// One payroll payment attempt: sender, receiver, amount, the provider's
/// payment snapshot and the lifecycle status mutated by webhook events.
/// Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disbursement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub salary_amount: f64,
    pub status: String,
    pub payment: Payment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_decodes_from_partial_provider_response() {
        let body = serde_json::json!({
            "id": "pay_123",
            "sequenceId": "0a1b2c",
            "status": "accepted",
            "amount": 120.5
        });
        let payment: Payment = serde_json::from_value(body).unwrap();
        assert_eq!(payment.sequence_id, "0a1b2c");
        assert_eq!(payment.amount, 120.5);
        assert!(payment.currency.is_empty());
    }

    #[test]
    fn disbursement_serializes_nested_sequence_id() {
        let disbursement = Disbursement {
            id: None,
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            salary_amount: 1000.0,
            status: status::PROCESSING.to_string(),
            payment: Payment {
                sequence_id: "seq-1".to_string(),
                ..Payment::default()
            },
            created_at: Some(Utc::now()),
            updated_at: None,
        };

        let json = serde_json::to_value(&disbursement).unwrap();
        assert_eq!(json["payment"]["sequenceId"], "seq-1");
        assert_eq!(json["status"], "processing");
    }
}
