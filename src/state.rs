use std::sync::Arc;

use crate::database::Store;
use crate::services::{PaymentGateway, TokenKeys};

/// Shared application state, built once in `main` and cloned into every worker
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, gateway: Arc<dyn PaymentGateway>, tokens: Arc<TokenKeys>) -> Self {
        Self { store, gateway, tokens }
    }
}
