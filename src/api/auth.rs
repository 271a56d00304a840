use actix_web::{web, HttpResponse};

use crate::services::token_service::{TokenRequest, TokenResponse};
use crate::state::AppState;
use crate::utils::ApiError;

#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Signed bearer token, valid for 10 hours", body = TokenResponse),
        (status = 400, description = "Missing email")
    )
)]
pub async fn sign_token(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> Result<HttpResponse, ApiError> {
    log::info!("🔐 POST /jwt - email: {}", request.email);

    if request.email.trim().is_empty() {
        return Err(ApiError::InvalidArgument("Email is required".to_string()));
    }

    let token = state.tokens.sign(&request.email).map_err(|e| {
        log::error!("❌ {}", e);
        ApiError::Internal
    })?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
