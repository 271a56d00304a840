mod mongo;
#[cfg(test)]
pub mod memory;

pub use mongo::MongoDB;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Card, Class, Payment, Role, User, UserProfile};

pub const USERS: &str = "users";
pub const CLASSES: &str = "classes";
pub const CARDS: &str = "cards";
pub const PAYMENTS: &str = "payments";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No seats available for this class")]
    SeatsExhausted,

    #[error("Cart item not found")]
    CardNotFound,

    #[error("{0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

fn bson_id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Acknowledgement of an insert, shaped like the driver's own result
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertSummary {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl From<mongodb::results::InsertOneResult> for InsertSummary {
    fn from(r: mongodb::results::InsertOneResult) -> Self {
        InsertSummary {
            acknowledged: true,
            inserted_id: bson_id_to_string(&r.inserted_id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

impl From<mongodb::results::UpdateResult> for UpdateSummary {
    fn from(r: mongodb::results::UpdateResult) -> Self {
        UpdateSummary {
            acknowledged: true,
            matched_count: r.matched_count,
            modified_count: r.modified_count,
            upserted_id: r.upserted_id.as_ref().map(bson_id_to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<mongodb::results::DeleteResult> for DeleteSummary {
    fn from(r: mongodb::results::DeleteResult) -> Self {
        DeleteSummary {
            acknowledged: true,
            deleted_count: r.deleted_count,
        }
    }
}

/// Combined result of a committed checkout
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub insert_result: InsertSummary,
    pub delete_result: DeleteSummary,
    pub class_result: UpdateSummary,
    pub instructor_result: UpdateSummary,
}

/// Which class a checkout charges a seat against
#[derive(Debug, Clone, PartialEq)]
pub enum ClassTarget {
    Id(ObjectId),
    /// Legacy clients that only send the instructor's email
    FirstOwnedBy(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    Natural,
    /// sell_count descending
    Popular,
}

/// Document-store operations behind every route.
///
/// `MongoDB` is the production implementation; handlers only see this trait.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    async fn upsert_user(&self, email: &str, profile: &UserProfile) -> StoreResult<UpdateSummary>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_instructors(&self, order: ListOrder) -> StoreResult<Vec<User>>;
    async fn set_user_role(&self, id: ObjectId, role: Role) -> StoreResult<UpdateSummary>;
    async fn delete_user(&self, id: ObjectId) -> StoreResult<DeleteSummary>;

    async fn insert_class(&self, class: &Class) -> StoreResult<InsertSummary>;
    async fn list_classes(&self, order: ListOrder) -> StoreResult<Vec<Class>>;

    async fn insert_card(&self, card: &Card) -> StoreResult<InsertSummary>;
    async fn list_cards(&self, user_email: &str) -> StoreResult<Vec<Card>>;
    async fn find_card(&self, id: ObjectId) -> StoreResult<Option<Card>>;
    async fn delete_card(&self, id: ObjectId) -> StoreResult<DeleteSummary>;

    /// Payments for `email`, newest first
    async fn list_payments(&self, email: &str) -> StoreResult<Vec<Payment>>;

    /// Records `payment` and does the seat/sales bookkeeping as one unit:
    /// either every write lands or none does.
    async fn checkout(
        &self,
        payment: &Payment,
        card_id: ObjectId,
        class: &ClassTarget,
    ) -> StoreResult<CheckoutReceipt>;
}
