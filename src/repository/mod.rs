use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::database::{Collection, DbPool, StoreError};
use crate::models::{Disbursement, Employee, User};

/// Typed wrappers over the document store, one per record type. Each call
/// is a single independent store operation; there are no cross-collection
/// transactions.
pub struct Repositories {
    pub users: UserRepository,
    pub employees: EmployeeRepository,
    pub disbursements: DisbursementRepository,
}

impl Repositories {
    pub fn new(pool: &DbPool, op_timeout: Duration) -> Self {
        Self {
            users: UserRepository {
                col: Collection::new(pool, "users", op_timeout),
            },
            employees: EmployeeRepository {
                col: Collection::new(pool, "employees", op_timeout),
            },
            disbursements: DisbursementRepository {
                col: Collection::new(pool, "disbursements", op_timeout),
            },
        }
    }

    /// Lookup indexes created at startup. The unique email index backs the
    /// registration conflict check; the sequence-id index backs webhook
    /// correlation.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.users.col.create_index("email", true).await?;
        self.employees.col.create_index("userId", false).await?;
        self.disbursements
            .col
            .create_index("payment.sequenceId", false)
            .await?;
        Ok(())
    }
}

pub struct UserRepository {
    col: Collection<User>,
}

impl UserRepository {
    pub async fn create(&self, user: &User) -> Result<Uuid, StoreError> {
        self.col.create(user).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.col.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.col.find_one(&json!({ "email": email })).await
    }
}

pub struct EmployeeRepository {
    col: Collection<Employee>,
}

impl EmployeeRepository {
    pub async fn create(&self, employee: &Employee) -> Result<Uuid, StoreError> {
        self.col.create(employee).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        self.col.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        self.col.find_one(&json!({ "email": email })).await
    }

    /// Merge-updates the given fields. Returns whether a record matched.
    pub async fn update(&self, id: Uuid, patch: &serde_json::Value) -> Result<bool, StoreError> {
        self.col.update_by_id(id, patch).await
    }

    /// Deletes an employee only if it belongs to `owner_id`; deleting
    /// another user's employee affects zero documents.
    pub async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<u64, StoreError> {
        self.col
            .delete_many(&json!({ "id": id, "userId": owner_id }))
            .await
    }
}

pub struct DisbursementRepository {
    col: Collection<Disbursement>,
}

impl DisbursementRepository {
    pub async fn create(&self, disbursement: &Disbursement) -> Result<Uuid, StoreError> {
        self.col.create(disbursement).await
    }

    pub async fn find_by_sequence_id(
        &self,
        sequence_id: &str,
    ) -> Result<Option<Disbursement>, StoreError> {
        self.col
            .find_one(&json!({ "payment": { "sequenceId": sequence_id } }))
            .await
    }

    /// Overwrites only the status field (and the update timestamp); the
    /// embedded payment snapshot is never touched after creation.
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<bool, StoreError> {
        self.col
            .update_by_id(id, &json!({ "status": status, "updatedAt": Utc::now() }))
            .await
    }
}
