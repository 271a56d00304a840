use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Creative Snap API",
        version = "1.0.0",
        description = "Backend for the Creative Snap photography class marketplace.\n\n**Authentication:** mutating endpoints require a bearer token issued by `POST /jwt`.\n\n**Features:**\n- User profiles and roles\n- Class listings and popularity rankings\n- Shopping cart\n- Card payments and purchase checkout"
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Auth
        crate::api::auth::sign_token,

        // Users
        crate::api::users::upsert_user,
        crate::api::users::list_popular_instructors,

        // Classes
        crate::api::classes::create_class,
        crate::api::classes::list_classes,

        // Payments
        crate::api::payments::create_payment_intent,
        crate::api::payments::checkout,
        crate::api::payments::list_payments,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::services::token_service::TokenRequest,
            crate::services::token_service::TokenResponse,
            crate::models::Role,
            crate::models::UserProfile,
            crate::models::UserResponse,
            crate::models::NewClass,
            crate::models::ClassResponse,
            crate::models::NewCard,
            crate::models::CardResponse,
            crate::models::CheckoutRequest,
            crate::models::PaymentResponse,
            crate::database::InsertSummary,
            crate::database::UpdateSummary,
            crate::database::DeleteSummary,
            crate::database::CheckoutReceipt,
            crate::services::payment_gateway::PaymentIntentRequest,
            crate::services::payment_gateway::PaymentIntentResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database connectivity."),
        (name = "Auth", description = "Bearer token issuing."),
        (name = "Users", description = "Profiles, roles and instructor rankings."),
        (name = "Classes", description = "Class listings."),
        (name = "Payments", description = "Payment intents, checkout and purchase history."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /jwt"))
                        .build()
                ),
            );
        }
    }
}
