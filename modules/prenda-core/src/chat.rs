//! End-to-end chat pipeline: resolve intent, execute the named action
//! against the stores, then phrase the outcome through a second LLM pass.
//!
//! Fallback rule: once the model has answered, the user always gets SOME
//! reply. Unusable structured output routes to the free-text branch instead
//! of surfacing an error. Store and transport failures still propagate.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cart::CartLifecycle;
use crate::catalog::CatalogQueries;
use crate::compose::{compose, ActionResult};
use crate::error::Result;
use crate::intent::{resolve, Action, LlmAgent, ResolvedIntent};
use crate::types::{CartItemInput, ProductFilters};

/// Items as the model requests them in `create_cart` arguments: attributes,
/// not product ids. Each one is resolved against the catalog before any
/// cart row is written.
#[derive(Debug, Clone, Deserialize)]
struct RequestedItem {
    #[serde(rename = "type")]
    product_type: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    category: Option<String>,
    qty: i64,
}

#[derive(Debug, Deserialize)]
struct CreateCartArgs {
    items: Vec<RequestedItem>,
}

#[derive(Clone)]
pub struct ChatService {
    agent: Arc<dyn LlmAgent>,
    catalog: Arc<dyn CatalogQueries>,
    carts: Arc<dyn CartLifecycle>,
}

impl ChatService {
    pub fn new(
        agent: Arc<dyn LlmAgent>,
        catalog: Arc<dyn CatalogQueries>,
        carts: Arc<dyn CartLifecycle>,
    ) -> Self {
        Self {
            agent,
            catalog,
            carts,
        }
    }

    /// Answer one free-text message in the context of `session_id`.
    pub async fn ask(&self, message: &str, session_id: &str) -> Result<String> {
        let intent = resolve(self.agent.as_ref(), message).await?;

        match intent {
            ResolvedIntent::Call { action, args } => {
                info!(action = action.name(), %session_id, "Dispatching action");
                self.execute(action, args, session_id, message).await
            }
            ResolvedIntent::Text(text) if !text.is_empty() => Ok(text),
            ResolvedIntent::Text(_) => self.fallback(message).await,
        }
    }

    async fn execute(
        &self,
        action: Action,
        args: Value,
        session_id: &str,
        message: &str,
    ) -> Result<String> {
        match action {
            Action::GetProducts => self.run_get_products(args).await,
            Action::CreateCart => self.run_create_cart(args, session_id, message).await,
            Action::GetCart => self.run_get_cart(args, session_id).await,
            Action::DeleteCart => self.run_delete_cart(args, session_id).await,
        }
    }

    async fn run_get_products(&self, args: Value) -> Result<String> {
        let filters: ProductFilters = match serde_json::from_value(args.clone()) {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, "Unusable get_products arguments, falling back");
                return self.fallback(&args.to_string()).await;
            }
        };

        // A lone `q` with no structured filters is a broad text search.
        let products = match (&filters.q, filters.is_unfiltered()) {
            (Some(q), true) => self.catalog.search_by_text(q).await?,
            _ => self.catalog.get_products(&filters).await?,
        };

        debug!(count = products.len(), "Catalog query finished");
        compose(
            self.agent.as_ref(),
            Action::GetProducts,
            &args,
            &ActionResult::Products(products),
        )
        .await
    }

    async fn run_create_cart(
        &self,
        args: Value,
        session_id: &str,
        message: &str,
    ) -> Result<String> {
        let parsed: CreateCartArgs = match serde_json::from_value(args.clone()) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Unusable create_cart arguments, falling back");
                return self.fallback(message).await;
            }
        };

        let mut items = Vec::with_capacity(parsed.items.len());
        for requested in &parsed.items {
            let filters = ProductFilters {
                product_type: Some(requested.product_type.clone()),
                size: requested.size.clone(),
                color: requested.color.clone(),
                category: requested.category.clone(),
                ..ProductFilters::default()
            };
            let matches = self.catalog.get_products(&filters).await?;

            let Some(product) = matches.first() else {
                // Direct reply, no phrasing pass: the user needs to know
                // exactly which item failed to match.
                return Ok(format!(
                    "No encontré un producto que coincida con: {} {} {}",
                    requested.product_type,
                    requested.color.as_deref().unwrap_or(""),
                    requested.size.as_deref().unwrap_or(""),
                )
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "));
            };

            items.push(CartItemInput {
                product_id: product.id,
                qty: requested.qty,
            });
        }

        // Create-vs-update lives here, not in the store: one cart per
        // session, so an existing cart means "add to it".
        let cart = match self.carts.get_cart(session_id).await? {
            Some(_) => self.carts.update_cart(session_id, &items).await?,
            None => self.carts.create_cart(session_id, &items).await?,
        };

        compose(
            self.agent.as_ref(),
            Action::CreateCart,
            &args,
            &ActionResult::Cart(cart),
        )
        .await
    }

    async fn run_get_cart(&self, args: Value, session_id: &str) -> Result<String> {
        match self.carts.get_cart(session_id).await? {
            Some(cart) => {
                compose(
                    self.agent.as_ref(),
                    Action::GetCart,
                    &args,
                    &ActionResult::Cart(cart),
                )
                .await
            }
            None => Ok("No hay carrito para este id".to_string()),
        }
    }

    async fn run_delete_cart(&self, args: Value, session_id: &str) -> Result<String> {
        let receipt = self.carts.delete_cart_by_session(session_id).await?;
        compose(
            self.agent.as_ref(),
            Action::DeleteCart,
            &args,
            &ActionResult::Deleted(receipt),
        )
        .await
    }

    /// The "otro" branch: answer conversationally when no action applies.
    async fn fallback(&self, message: &str) -> Result<String> {
        let prompt =
            format!("No pude interpretar bien tu pregunta, pero te respondo esto: {message}");
        Ok(self.agent.generate(&prompt).await?)
    }
}
