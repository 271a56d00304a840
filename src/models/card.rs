use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Cart item (collection `cards`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_email: String,
    #[serde(rename = "classId", default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_email: Option<String>,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct NewCard {
    pub user_email: String,
    #[serde(rename = "classId")]
    pub class_id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub instructor_name: Option<String>,
    pub instructor_email: Option<String>,
    pub price: f64,
}

impl From<NewCard> for Card {
    fn from(c: NewCard) -> Self {
        Card {
            id: None,
            user_email: c.user_email,
            class_id: c.class_id,
            name: c.name,
            image: c.image,
            instructor_name: c.instructor_name,
            instructor_email: c.instructor_email,
            price: c.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CardResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_email: String,
    #[serde(rename = "classId")]
    pub class_id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub instructor_name: Option<String>,
    pub instructor_email: Option<String>,
    pub price: f64,
}

impl From<Card> for CardResponse {
    fn from(c: Card) -> Self {
        CardResponse {
            id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_email: c.user_email,
            class_id: c.class_id,
            name: c.name,
            image: c.image,
            instructor_name: c.instructor_name,
            instructor_email: c.instructor_email,
            price: c.price,
        }
    }
}
