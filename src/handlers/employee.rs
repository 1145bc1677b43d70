use axum::{extract::State, Extension};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::models::{Employee, EmployeeView};
use crate::state::AppState;
use crate::utils::error::ApiError;
use crate::utils::extract::{Json, Path};
use crate::utils::response::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bvn: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub id_type: String,
    #[serde(default)]
    pub additional_id_type: String,
    pub salary: f64,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub bank_name: String,
}

/// Merge-update payload: only the provided fields are written.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bvn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_id_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeView>>, ApiError> {
    for (field, value) in [
        ("firstName", &request.first_name),
        ("lastName", &request.last_name),
        ("email", &request.email),
        ("accountName", &request.account_name),
        ("accountNumber", &request.account_number),
        ("accountType", &request.account_type),
        ("bankName", &request.bank_name),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!("{field} is required")));
        }
    }
    if request.salary <= 0.0 {
        return Err(ApiError::Validation("salary must be positive".to_string()));
    }

    let email = request.email.trim().to_lowercase();
    if state.repos.employees.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict(
            "employee with the provided email exists already".to_string(),
        ));
    }

    let now = Utc::now();
    let mut employee = Employee {
        id: None,
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        middle_name: request.middle_name,
        email,
        bvn: request.bvn,
        dob: request.dob,
        address: request.address,
        phone: request.phone,
        country: request.country,
        id_number: request.id_number,
        id_type: request.id_type,
        additional_id_type: request.additional_id_type,
        salary: request.salary,
        user_id: current.id,
        account_name: request.account_name,
        account_number: request.account_number,
        account_type: request.account_type,
        bank_name: request.bank_name,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let id = state.repos.employees.create(&employee).await?;
    employee.id = Some(id);
    info!(employee_id = %id, owner_id = %current.id, "employee created");

    Ok(ApiResponse::with_data(
        "employee created successfully",
        EmployeeView::from(employee),
    ))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mut patch = serde_json::to_value(&request)
        .map_err(|e| ApiError::Internal(format!("encoding update failed: {e}")))?;

    // Serialization of an all-optional struct always yields an object.
    if let Some(fields) = patch.as_object_mut() {
        if fields.is_empty() {
            return Err(ApiError::Validation("no fields to update".to_string()));
        }
        fields.insert("updatedAt".to_string(), json!(Utc::now()));
    }

    let matched = state.repos.employees.update(employee_id, &patch).await?;
    if !matched {
        return Err(ApiError::NotFound(format!(
            "employee with id [{employee_id}] not found"
        )));
    }

    Ok(ApiResponse::message("employee updated successfully"))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    // Scoped to the caller: an id owned by another user matches nothing.
    let deleted = state
        .repos
        .employees
        .delete_owned(employee_id, current.id)
        .await?;

    info!(employee_id = %employee_id, owner_id = %current.id, deleted, "employee delete");

    Ok(ApiResponse::with_data(
        "employee delete processed",
        json!({ "deleted": deleted }),
    ))
}
