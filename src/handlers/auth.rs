use axum::extract::State;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::models::{User, UserView};
use crate::state::AppState;
use crate::utils::error::ApiError;
use crate::utils::extract::Json;
use crate::utils::response::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
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
    #[serde(default)]
    pub additional_id_number: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    for (field, value) in [
        ("firstName", &request.first_name),
        ("lastName", &request.last_name),
        ("email", &request.email),
        ("password", &request.password),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!("{field} is required")));
        }
    }

    let dob = NaiveDate::parse_from_str(&request.dob, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("invalid date of birth".to_string()))?;

    let email = request.email.trim().to_lowercase();
    if state.repos.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict(
            "user with the provided email exists".to_string(),
        ));
    }

    let now = Utc::now();
    let mut user = User {
        id: None,
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        middle_name: String::new(),
        email,
        password: hash_password(&request.password)?,
        bvn: request.bvn,
        dob: dob.format("%Y-%m-%d").to_string(),
        address: request.address,
        phone: request.phone,
        country: request.country,
        id_number: request.id_number,
        id_type: request.id_type,
        additional_id_type: request.additional_id_type,
        additional_id_number: request.additional_id_number,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let id = state.repos.users.create(&user).await?;
    user.id = Some(id);
    info!(user_id = %id, "user registered");

    Ok(ApiResponse::with_data(
        "user created successfully",
        UserView::from(user),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    // One error message for both unknown email and wrong password.
    let invalid = || ApiError::Unauthorized("invalid email or password".to_string());

    let email = request.email.trim().to_lowercase();
    let user = state
        .repos
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &user.password) {
        return Err(invalid());
    }

    let user_id = user.id.ok_or_else(|| {
        ApiError::Internal("stored user record is missing its identifier".to_string())
    })?;

    let subject = format!("{}:{}", user.first_name, user.last_name);
    let access_token = state.tokens.issue(user_id, &subject)?;

    Ok(ApiResponse::with_data(
        "login successful",
        LoginResponse { access_token },
    ))
}

pub async fn logout() -> Json<ApiResponse<()>> {
    // Tokens are stateless; logout is an acknowledgement.
    ApiResponse::message("logged out")
}
