use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::middleware::auth::Claims;
use crate::models::{Card, CardResponse, NewCard};
use crate::state::AppState;
use crate::utils::ApiError;

/// POST /cards - Adds a class to the caller's cart
pub async fn add_card(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<NewCard>,
) -> Result<HttpResponse, ApiError> {
    log::info!("🛒 POST /cards - {} (token {})", request.user_email, user.email);

    let card = Card::from(request.into_inner());
    let result = state.store.insert_card(&card).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /cards/{email} - Cart items of a user
pub async fn list_cards(
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let cards = state.store.list_cards(&email).await?;
    let cards: Vec<CardResponse> = cards.into_iter().map(CardResponse::from).collect();
    Ok(HttpResponse::Ok().json(cards))
}

/// GET /cards/single/{id} - `null` body when the item is gone
pub async fn get_card(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let card = state.store.find_card(parse_id(&id)?).await?;
    Ok(HttpResponse::Ok().json(card.map(CardResponse::from)))
}

/// DELETE /cards/{id}
pub async fn delete_card(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let object_id = parse_id(&id)?;
    log::info!("🗑️  DELETE /cards/{} - by {}", id, user.email);

    let result = state.store.delete_card(object_id).await?;
    Ok(HttpResponse::Ok().json(result))
}
