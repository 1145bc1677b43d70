use axum::{body::Bytes, extract::State, http::HeaderMap};
use serde::Deserialize;
use tracing::{debug, info};

use crate::provider::WebhookVerifier;
use crate::state::AppState;
use crate::utils::error::ApiError;
use crate::utils::extract::Json;
use crate::utils::response::ApiResponse;

pub const SIGNATURE_HEADER: &str = "X-YC-Signature";

pub const PENDING_EVENT: &str = "PAYMENT.PENDING";
pub const FAILED_EVENT: &str = "PAYMENT.FAILED";
pub const COMPLETE_EVENT: &str = "PAYMENT.COMPLETE";

/// Provider callback payload. Carries no ordering or staleness token, so
/// a later callback always overwrites the status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(default)]
    pub id: String,
    pub sequence_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub api_key: String,
    pub event: String,
    #[serde(default)]
    pub executed_at: i64,
}

/// Recognized transition events flip the disbursement status; anything
/// else is acknowledged and ignored, which keeps the endpoint forward
/// compatible with new provider event types.
fn is_transition_event(event: &str) -> bool {
    matches!(event, PENDING_EVENT | FAILED_EVENT | COMPLETE_EVENT)
}

/// Authenticates and parses a callback body. The signature is checked
/// over the raw bytes first; a failed check returns before the body is
/// ever read as JSON, so nothing downstream can run on forged input.
fn decode_event(
    verifier: &WebhookVerifier,
    body: &[u8],
    signature: &str,
) -> Result<WebhookEvent, ApiError> {
    if !verifier.verify(body, signature) {
        return Err(ApiError::Validation(
            "webhook signature verification failed".to_string(),
        ));
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("malformed webhook payload: {e}")))
}

/// Ingests a provider status callback. All store access happens after
/// [`decode_event`] has authenticated the payload.
pub async fn yellow_card_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let event = decode_event(&state.webhook_verifier, &body, signature)?;

    let disbursement = state
        .repos
        .disbursements
        .find_by_sequence_id(&event.sequence_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "no disbursement for sequence id [{}]",
                event.sequence_id
            ))
        })?;

    if is_transition_event(&event.event) {
        let id = disbursement.id.ok_or_else(|| {
            ApiError::Internal("stored disbursement record is missing its identifier".to_string())
        })?;
        state
            .repos
            .disbursements
            .update_status(id, &event.status)
            .await?;
        info!(
            sequence_id = %event.sequence_id,
            event = %event.event,
            status = %event.status,
            "disbursement status updated"
        );
    } else {
        debug!(event = %event.event, "ignoring unrecognized webhook event");
    }

    Ok(ApiResponse::message("webhook processed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_known_events_trigger_a_transition() {
        assert!(is_transition_event(PENDING_EVENT));
        assert!(is_transition_event(FAILED_EVENT));
        assert!(is_transition_event(COMPLETE_EVENT));

        assert!(!is_transition_event("PAYMENT.PROCESSING"));
        assert!(!is_transition_event("PAYMENT.REFUNDED"));
        assert!(!is_transition_event(""));
        assert!(!is_transition_event("payment.complete"));
    }

    #[test]
    fn event_decodes_from_provider_payload() {
        let body = r#"{
            "id": "evt_1",
            "sequenceId": "7f9c0a",
            "status": "complete",
            "apiKey": "pk_live",
            "event": "PAYMENT.COMPLETE",
            "executedAt": 1767000000
        }"#;
        let event: WebhookEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.sequence_id, "7f9c0a");
        assert_eq!(event.event, COMPLETE_EVENT);
        assert_eq!(event.status, "complete");
    }

    #[test]
    fn payload_without_sequence_id_is_rejected() {
        let body = r#"{"event": "PAYMENT.COMPLETE", "status": "complete"}"#;
        assert!(serde_json::from_str::<WebhookEvent>(body).is_err());
    }

    const SIGNED_BODY: &[u8] =
        br#"{"sequenceId":"seq-1","event":"PAYMENT.COMPLETE","status":"complete"}"#;

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new("whsec-test")
    }

    #[test]
    fn genuine_signature_decodes_the_event() {
        let signature = verifier().sign(SIGNED_BODY);
        let event = decode_event(&verifier(), SIGNED_BODY, &signature).unwrap();
        assert_eq!(event.sequence_id, "seq-1");
        assert_eq!(event.status, "complete");
        assert!(is_transition_event(&event.event));
    }

    #[test]
    fn forged_signature_never_reaches_the_payload() {
        let forged = WebhookVerifier::new("other-secret").sign(SIGNED_BODY);
        let err = decode_event(&verifier(), SIGNED_BODY, &forged).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref msg) if msg.contains("signature")));
    }

    #[test]
    fn signature_is_checked_before_parsing() {
        // Unparseable body with a bad signature fails on the signature,
        // never on parsing.
        let err = decode_event(&verifier(), b"not json", "bogus").unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref msg) if msg.contains("signature")));
    }

    #[test]
    fn authenticated_but_malformed_payload_is_a_validation_error() {
        let body = b"not json";
        let signature = verifier().sign(body);
        let err = decode_event(&verifier(), body, &signature).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref msg) if msg.contains("malformed")));
    }

    #[test]
    fn tampered_body_fails_against_the_original_signature() {
        let signature = verifier().sign(SIGNED_BODY);
        let tampered =
            br#"{"sequenceId":"seq-2","event":"PAYMENT.COMPLETE","status":"complete"}"#;
        let err = decode_event(&verifier(), tampered, &signature).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref msg) if msg.contains("signature")));
    }
}
