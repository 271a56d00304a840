use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Payment record (collection `payments`). Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    /// Card that was purchased
    #[serde(rename = "itemId")]
    pub item_id: String,
    #[serde(rename = "classId", default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub instructor_email: String,
    /// Seat count as the client saw it when submitting
    #[serde(rename = "Available_seats")]
    pub available_seats: i64,
    pub date: BsonDateTime,
    pub price: f64,
    #[serde(rename = "transactionId", default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Body of `POST /payments`
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CheckoutRequest {
    pub email: String,
    #[serde(rename = "itemId")]
    pub item_id: String,
    #[serde(rename = "classId")]
    pub class_id: Option<String>,
    pub instructor_email: String,
    #[serde(rename = "Available_seats")]
    pub available_seats: i64,
    pub price: f64,
    /// RFC 3339 timestamp; defaults to the time the request is handled
    pub date: Option<String>,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PaymentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(rename = "itemId")]
    pub item_id: String,
    #[serde(rename = "classId")]
    pub class_id: Option<String>,
    pub instructor_email: String,
    #[serde(rename = "Available_seats")]
    pub available_seats: i64,
    pub date: String,
    pub price: f64,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        PaymentResponse {
            id: p.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: p.email,
            item_id: p.item_id,
            class_id: p.class_id,
            instructor_email: p.instructor_email,
            available_seats: p.available_seats,
            date: p.date.try_to_rfc3339_string().unwrap_or_default(),
            price: p.price,
            transaction_id: p.transaction_id,
        }
    }
}
