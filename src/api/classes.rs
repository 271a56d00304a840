use actix_web::{web, HttpResponse};

use crate::database::{InsertSummary, ListOrder};
use crate::middleware::auth::Claims;
use crate::models::{Class, ClassResponse, NewClass};
use crate::state::AppState;
use crate::utils::ApiError;

/// POST /classes - New listing; sell_count always starts at 0
#[utoipa::path(
    post,
    path = "/classes",
    tag = "Classes",
    request_body = NewClass,
    responses(
        (status = 200, description = "Insert acknowledgement", body = InsertSummary),
        (status = 400, description = "Negative seat count"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_class(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<NewClass>,
) -> Result<HttpResponse, ApiError> {
    log::info!("📚 POST /classes - {} by {}", request.name, user.email);

    if request.available_seats < 0 {
        return Err(ApiError::InvalidArgument(
            "Available_seats must not be negative".to_string(),
        ));
    }

    let class = Class::from(request.into_inner());
    let result = state.store.insert_class(&class).await?;

    log::info!("✅ Class created: {}", result.inserted_id);
    Ok(HttpResponse::Ok().json(result))
}

fn to_responses(classes: Vec<Class>) -> Vec<ClassResponse> {
    classes.into_iter().map(ClassResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/classes",
    tag = "Classes",
    responses((status = 200, description = "All classes", body = [ClassResponse]))
)]
pub async fn list_classes(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let classes = state.store.list_classes(ListOrder::Natural).await?;
    Ok(HttpResponse::Ok().json(to_responses(classes)))
}

/// GET /classes/popular - Highest sell_count first
pub async fn list_popular_classes(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let classes = state.store.list_classes(ListOrder::Popular).await?;
    Ok(HttpResponse::Ok().json(to_responses(classes)))
}
