pub mod carts;
pub mod chat;
pub mod products;

use std::sync::Arc;

use whatsapp_client::WhatsAppClient;

use prenda_core::{CartLifecycle, CatalogQueries, ChatService, LlmAgent};

/// Session id used when a caller does not supply one (single-user demo
/// channel, matching the default WhatsApp test number).
pub const DEFAULT_SESSION: &str = "3194014";

#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
    pub agent: Arc<dyn LlmAgent>,
    pub catalog: Arc<dyn CatalogQueries>,
    pub carts: Arc<dyn CartLifecycle>,
    pub whatsapp: Arc<WhatsAppClient>,
    pub verify_token: String,
}
