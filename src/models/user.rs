use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account holder and payment sender. The password is always stored
/// hashed and is never part of any API view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub email: String,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The user representation returned to API callers. Names exactly the
/// exposed fields; password and timestamps are not among them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
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
    pub additional_id_number: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            middle_name: user.middle_name,
            email: user.email,
            bvn: user.bvn,
            dob: user.dob,
            address: user.address,
            phone: user.phone,
            country: user.country,
            id_number: user.id_number,
            id_type: user.id_type,
            additional_id_type: user.additional_id_type,
            additional_id_number: user.additional_id_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Some(Uuid::new_v4()),
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            middle_name: String::new(),
            email: "ada@example.com".to_string(),
            password: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".to_string(),
            bvn: "22112345678".to_string(),
            dob: "1991-04-12".to_string(),
            address: "12 Marina Rd".to_string(),
            phone: "+2348012345678".to_string(),
            country: "NG".to_string(),
            id_number: "A01234567".to_string(),
            id_type: "passport".to_string(),
            additional_id_type: String::new(),
            additional_id_number: String::new(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    #[test]
    fn view_never_contains_password_or_timestamps() {
        let view = UserView::from(sample_user());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("createdAt").is_none());
        assert!(json.get("updatedAt").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn user_round_trips_through_json() {
        let user = sample_user();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["firstName"], "Ada");
        let back: User = serde_json::from_value(value).unwrap();
        assert_eq!(back.email, user.email);
        assert_eq!(back.id, user.id);
    }
}
