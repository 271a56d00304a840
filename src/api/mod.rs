pub mod auth;
pub mod cards;
pub mod classes;
pub mod health;
pub mod payments;
pub mod swagger;
pub mod users;

use actix_web::{error, guard, web, HttpRequest};
use mongodb::bson::oid::ObjectId;

use crate::middleware::AuthMiddleware;
use crate::utils::ApiError;

pub(crate) fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::InvalidArgument("Invalid id".to_string()))
}

fn json_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️  {} {} rejected body: {}", req.method(), req.path(), err);
    ApiError::InvalidArgument(err.to_string()).into()
}

fn path_error(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️  {} {} rejected path: {}", req.method(), req.path(), err);
    ApiError::InvalidArgument(err.to_string()).into()
}

/// Registers every route. Resources wrapped with `auth` require a bearer token.
///
/// Paths shared by public and protected methods are split into two resources
/// with a method guard, so the protected one only matches its own method.
pub fn configure(cfg: &mut web::ServiceConfig, auth: AuthMiddleware) {
    cfg
        // Extractor failures render like every other ApiError
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        // Health
        .route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health_check))
        // Token issuing
        .route("/jwt", web::post().to(auth::sign_token))
        // ==================== USERS ====================
        .service(
            web::resource("/users")
                .wrap(auth.clone())
                .route(web::get().to(users::list_users)),
        )
        .service(
            web::resource("/users/admin/{id}")
                .wrap(auth.clone())
                .route(web::patch().to(users::make_admin)),
        )
        .service(
            web::resource("/users/instructor/{id}")
                .wrap(auth.clone())
                .route(web::patch().to(users::make_instructor)),
        )
        .service(
            web::resource("/users/{id}")
                .guard(guard::Delete())
                .wrap(auth.clone())
                .route(web::delete().to(users::delete_user)),
        )
        .service(
            web::resource("/users/{email}")
                .route(web::get().to(users::get_user))
                .route(web::put().to(users::upsert_user)),
        )
        .route("/instructors", web::get().to(users::list_instructors))
        .route("/instructors/popular", web::get().to(users::list_popular_instructors))
        // ==================== CLASSES ====================
        .service(
            web::resource("/classes")
                .guard(guard::Post())
                .wrap(auth.clone())
                .route(web::post().to(classes::create_class)),
        )
        .route("/classes", web::get().to(classes::list_classes))
        .route("/classes/popular", web::get().to(classes::list_popular_classes))
        // ==================== CARDS (cart) ====================
        .service(
            web::resource("/cards")
                .wrap(auth.clone())
                .route(web::post().to(cards::add_card)),
        )
        .service(
            web::resource("/cards/single/{id}")
                .wrap(auth.clone())
                .route(web::get().to(cards::get_card)),
        )
        // GET takes an email, DELETE takes a card id
        .service(
            web::resource("/cards/{key}")
                .wrap(auth.clone())
                .route(web::get().to(cards::list_cards))
                .route(web::delete().to(cards::delete_card)),
        )
        // ==================== PAYMENTS ====================
        .service(
            web::resource("/create-payment-intent")
                .wrap(auth.clone())
                .route(web::post().to(payments::create_payment_intent)),
        )
        .service(
            web::resource("/payments")
                .wrap(auth.clone())
                .route(web::post().to(payments::checkout)),
        )
        .service(
            web::resource("/payments/{email}")
                .wrap(auth)
                .route(web::get().to(payments::list_payments)),
        );
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::{
        body::MessageBody,
        dev::{ServiceFactory, ServiceRequest, ServiceResponse},
        web, App, Error,
    };
    use std::sync::Arc;

    use crate::database::memory::MemoryStore;
    use crate::middleware::AuthMiddleware;
    use crate::services::payment_gateway::testing::RecordingGateway;
    use crate::services::TokenKeys;
    use crate::state::AppState;

    pub struct Harness {
        pub store: Arc<MemoryStore>,
        pub gateway: Arc<RecordingGateway>,
        pub state: AppState,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_gateway(RecordingGateway::default())
        }

        pub fn with_gateway(gateway: RecordingGateway) -> Self {
            let store = Arc::new(MemoryStore::new());
            let gateway = Arc::new(gateway);
            let tokens = Arc::new(TokenKeys::new("test-access-key"));
            let state = AppState::new(store.clone(), gateway.clone(), tokens);
            Self { store, gateway, state }
        }

        pub fn bearer(&self, email: &str) -> (&'static str, String) {
            let token = self.state.tokens.sign(email).unwrap();
            ("Authorization", format!("Bearer {}", token))
        }

        pub fn app(
            &self,
        ) -> App<
            impl ServiceFactory<
                ServiceRequest,
                Config = (),
                Response = ServiceResponse<impl MessageBody>,
                Error = Error,
                InitError = (),
            >,
        > {
            let auth = AuthMiddleware::new(self.state.tokens.clone());
            App::new()
                .app_data(web::Data::new(self.state.clone()))
                .configure(move |cfg| super::configure(cfg, auth))
        }
    }
}
