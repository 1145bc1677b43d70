use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Settings;
use crate::database::DbPool;
use crate::provider::{WebhookVerifier, YellowCardClient};
use crate::repository::Repositories;

/// Application state shared across handlers. Constructed once in `main`
/// and passed by value; no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub db: DbPool,
    pub repos: Arc<Repositories>,
    pub tokens: Arc<TokenService>,
    pub payments: Arc<YellowCardClient>,
    pub webhook_verifier: Arc<WebhookVerifier>,
}
