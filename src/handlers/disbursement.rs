use axum::{extract::State, Extension};
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::config::ProviderConfig;
use crate::models::{status, Disbursement, Employee, User};
use crate::provider::{PaymentRequest, RequestDestination, RequestSender};
use crate::state::AppState;
use crate::utils::error::ApiError;
use crate::utils::extract::{Json, Path};
use crate::utils::response::ApiResponse;

/// Initiates a payroll payment: employee lookup, provider submission,
/// then one local disbursement record with status `processing`. Any
/// failure returns a structured error with no partial local write.
pub async fn create_disbursement(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Disbursement>>, ApiError> {
    let employee = state
        .repos
        .employees
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("employee with id [{employee_id}] not found")))?;

    let request = build_payment_request(&current.user, &employee, &state.settings.provider);
    let sequence_id = request.sequence_id.clone();

    let payment = state.payments.submit_payment(&request).await?;
    info!(sequence_id = %sequence_id, payment_id = %payment.id, "payment submitted");

    let now = Utc::now();
    let mut disbursement = Disbursement {
        id: None,
        sender_id: current.id,
        receiver_id: employee_id,
        salary_amount: employee.salary,
        status: status::PROCESSING.to_string(),
        payment,
        created_at: Some(now),
        updated_at: Some(now),
    };

    match state.repos.disbursements.create(&disbursement).await {
        Ok(id) => disbursement.id = Some(id),
        Err(err) => {
            // The payment exists upstream with no local record; there is
            // no compensating transaction. Surface loudly for operators.
            error!(
                sequence_id = %sequence_id,
                "payment submitted but disbursement record write failed: {err}"
            );
            return Err(err.into());
        }
    }

    Ok(ApiResponse::with_data(
        "disbursement submitted successfully",
        disbursement,
    ))
}

/// Combines the sender's KYC fields with the employee's bank destination
/// and a freshly generated sequence identifier.
fn build_payment_request(user: &User, employee: &Employee, cfg: &ProviderConfig) -> PaymentRequest {
    PaymentRequest {
        channel_id: cfg.channel_id.clone(),
        sequence_id: Uuid::new_v4().to_string(),
        local_amount: employee.salary,
        reason: "other".to_string(),
        sender: RequestSender {
            name: format!("{} {}", user.first_name, user.last_name),
            phone: user.phone.clone(),
            country: user.country.clone(),
            address: user.address.clone(),
            dob: user.dob.clone(),
            email: user.email.clone(),
            id_number: user.id_number.clone(),
            id_type: user.id_type.clone(),
            business_id: cfg.business_id.clone(),
            business_name: cfg.business_name.clone(),
            additional_id_type: user.additional_id_type.clone(),
            additional_id_number: user.additional_id_number.clone(),
        },
        destination: RequestDestination {
            account_number: employee.account_number.clone(),
            account_type: employee.account_type.clone(),
            network_id: cfg.network_id.clone(),
            account_bank: employee.bank_name.clone(),
            network_name: cfg.network_name.clone(),
            country: employee.country.clone(),
            account_name: format!("{} {}", employee.first_name, employee.last_name),
            phone_number: employee.phone.clone(),
        },
        force_accept: true,
        customer_type: "retail".to_string(),
    }
}
