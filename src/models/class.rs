use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Class listing (collection `classes`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
    pub instructor_email: String,
    #[serde(rename = "Available_seats")]
    pub available_seats: i64,
    pub price: f64,
    #[serde(default)]
    pub sell_count: i64,
}

/// Body of `POST /classes`
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct NewClass {
    pub name: String,
    pub image: Option<String>,
    pub instructor_name: Option<String>,
    pub instructor_email: String,
    #[serde(rename = "Available_seats")]
    pub available_seats: i64,
    pub price: f64,
}

impl From<NewClass> for Class {
    fn from(c: NewClass) -> Self {
        Class {
            id: None,
            name: c.name,
            image: c.image,
            instructor_name: c.instructor_name,
            instructor_email: c.instructor_email,
            available_seats: c.available_seats,
            price: c.price,
            sell_count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ClassResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub instructor_name: Option<String>,
    pub instructor_email: String,
    #[serde(rename = "Available_seats")]
    pub available_seats: i64,
    pub price: f64,
    pub sell_count: i64,
}

impl From<Class> for ClassResponse {
    fn from(c: Class) -> Self {
        ClassResponse {
            id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: c.name,
            image: c.image,
            instructor_name: c.instructor_name,
            instructor_email: c.instructor_email,
            available_seats: c.available_seats,
            price: c.price,
            sell_count: c.sell_count,
        }
    }
}
