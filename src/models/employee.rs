use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payee record owned by a user (`user_id` is a foreign-key reference,
/// not an ownership edge). Carries the salary and bank destination
/// details the disbursement flow submits to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
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
    pub user_id: Uuid,
    pub account_name: String,
    pub account_number: String,
    pub account_type: String,
    pub bank_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// API view of an employee: everything except timestamps.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub email: String,
    pub bvn: String,
    pub dob: String,
    pub address: String,
    pub phone: String,
    pub country: String,
    pub id_number: String,
    pub id_type: String,
    pub additional_id_type: String,
    pub salary: f64,
    pub user_id: Uuid,
    pub account_name: String,
    pub account_number: String,
    pub account_type: String,
    pub bank_name: String,
}

impl From<Employee> for EmployeeView {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            middle_name: e.middle_name,
            email: e.email,
            bvn: e.bvn,
            dob: e.dob,
            address: e.address,
            phone: e.phone,
            country: e.country,
            id_number: e.id_number,
            id_type: e.id_type,
            additional_id_type: e.additional_id_type,
            salary: e.salary,
            user_id: e.user_id,
            account_name: e.account_name,
            account_number: e.account_number,
            account_type: e.account_type,
            bank_name: e.bank_name,
        }
    }
}
