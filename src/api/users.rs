use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::database::{ListOrder, UpdateSummary};
use crate::middleware::auth::Claims;
use crate::models::{Role, UserProfile, UserResponse};
use crate::state::AppState;
use crate::utils::ApiError;

fn to_responses(users: Vec<crate::models::User>) -> Vec<UserResponse> {
    users.into_iter().map(UserResponse::from).collect()
}

/// PUT /users/{email} - Creates or overwrites the profile keyed by email
#[utoipa::path(
    put,
    path = "/users/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    request_body = UserProfile,
    responses((status = 200, description = "Upsert acknowledgement", body = UpdateSummary))
)]
pub async fn upsert_user(
    state: web::Data<AppState>,
    email: web::Path<String>,
    profile: web::Json<UserProfile>,
) -> Result<HttpResponse, ApiError> {
    log::info!("📝 PUT /users/{}", email);

    let result = state.store.upsert_user(&email, &profile).await?;

    if result.upserted_id.is_some() {
        log::info!("✅ User registered: {}", email);
    }
    Ok(HttpResponse::Ok().json(result))
}

/// GET /users - All users
pub async fn list_users(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    log::info!("👥 GET /users - requested by {}", user.email);

    let users = state.store.list_users().await?;
    Ok(HttpResponse::Ok().json(to_responses(users)))
}

/// GET /users/{email} - `null` body when no such user
pub async fn get_user(
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = state.store.find_user_by_email(&email).await?;
    Ok(HttpResponse::Ok().json(user.map(UserResponse::from)))
}

pub async fn list_instructors(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let instructors = state.store.list_instructors(ListOrder::Natural).await?;
    Ok(HttpResponse::Ok().json(to_responses(instructors)))
}

#[utoipa::path(
    get,
    path = "/instructors/popular",
    tag = "Users",
    responses((status = 200, description = "Instructors by sell_count, highest first", body = [UserResponse]))
)]
pub async fn list_popular_instructors(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let instructors = state.store.list_instructors(ListOrder::Popular).await?;
    Ok(HttpResponse::Ok().json(to_responses(instructors)))
}

async fn promote(state: &AppState, raw_id: &str, role: Role, by: &str) -> Result<HttpResponse, ApiError> {
    let id = parse_id(raw_id)?;
    log::info!("🎖️  Setting role {} on user {} (by {})", role.as_str(), raw_id, by);

    let result = state.store.set_user_role(id, role).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// PATCH /users/admin/{id}
pub async fn make_admin(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    promote(&state, &id, Role::Admin, &user.email).await
}

/// PATCH /users/instructor/{id}
pub async fn make_instructor(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    promote(&state, &id, Role::Instructor, &user.email).await
}

/// DELETE /users/{id}
pub async fn delete_user(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let object_id = parse_id(&id)?;
    log::info!("🗑️  DELETE /users/{} - by {}", id, user.email);

    let result = state.store.delete_user(object_id).await?;
    Ok(HttpResponse::Ok().json(result))
}
