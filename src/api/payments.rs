use actix_web::{web, HttpResponse};

use crate::database::CheckoutReceipt;
use crate::middleware::auth::Claims;
use crate::models::{CheckoutRequest, PaymentResponse};
use crate::services::checkout_service;
use crate::services::payment_gateway::{amount_in_minor_units, PaymentIntentRequest, PaymentIntentResponse};
use crate::state::AppState;
use crate::utils::ApiError;

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, description = "Client secret for completing the payment", body = PaymentIntentResponse),
        (status = 400, description = "Price is not a positive number"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Gateway failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_payment_intent(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<PaymentIntentRequest>,
) -> Result<HttpResponse, ApiError> {
    log::info!("💳 POST /create-payment-intent - price {} by {}", request.price, user.email);

    let amount = amount_in_minor_units(&request.price)
        .ok_or_else(|| ApiError::InvalidArgument("Invalid price".to_string()))?;

    let intent = state.gateway.create_payment_intent(amount).await?;

    Ok(HttpResponse::Ok().json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Payment recorded, cart item removed, seat and sales counters updated", body = CheckoutReceipt),
        (status = 400, description = "No seats left, unknown cart item or malformed ids"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn checkout(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, ApiError> {
    log::info!("🧾 POST /payments - item {} by {}", request.item_id, user.email);

    let receipt = checkout_service::checkout(state.store.as_ref(), request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(receipt))
}

#[utoipa::path(
    get,
    path = "/payments/{email}",
    tag = "Payments",
    params(("email" = String, Path, description = "Payer email")),
    responses(
        (status = 200, description = "Payments, newest first", body = [PaymentResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_payments(
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let payments = state.store.list_payments(&email).await?;
    let payments: Vec<PaymentResponse> = payments.into_iter().map(PaymentResponse::from).collect();
    Ok(HttpResponse::Ok().json(payments))
}
