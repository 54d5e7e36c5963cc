pub mod cart;
pub mod catalog;
pub mod chat;
pub mod compose;
pub mod config;
pub mod error;
pub mod intent;
pub mod normalize;
pub mod types;

pub use cart::{CartLifecycle, PgCarts};
pub use catalog::{CatalogQueries, PgCatalog};
pub use chat::ChatService;
pub use config::Config;
pub use error::{CommerceError, Result};
pub use intent::{Action, LlmAgent, ResolvedIntent};
pub use types::{CartItemInput, CartView, DeleteReceipt, Product, ProductFilters};
