//! Intent resolution: one LLM round trip that turns a free-text message into
//! either a structured action call or plain text.
//!
//! The action menu below is the single source of truth — the same
//! definitions are sent to the model as function declarations and used by
//! the dispatcher in `chat.rs`, so the two cannot drift.

use async_trait::async_trait;
use serde_json::{json, Value};

use ai_client::{AiError, FunctionReply, Gemini, ToolDefinition};

use crate::error::Result;

// ---------------------------------------------------------------------------
// LLM capability
// ---------------------------------------------------------------------------

/// The slice of the LLM provider this system needs. Injected so tests can
/// substitute a deterministic stub.
#[async_trait]
pub trait LlmAgent: Send + Sync {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, AiError>;

    async fn call_with_functions(
        &self,
        prompt: &str,
        functions: &[ToolDefinition],
    ) -> std::result::Result<FunctionReply, AiError>;
}

#[async_trait]
impl LlmAgent for Gemini {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, AiError> {
        Gemini::generate(self, prompt).await
    }

    async fn call_with_functions(
        &self,
        prompt: &str,
        functions: &[ToolDefinition],
    ) -> std::result::Result<FunctionReply, AiError> {
        Gemini::call_with_functions(self, prompt, functions).await
    }
}

// ---------------------------------------------------------------------------
// Action menu
// ---------------------------------------------------------------------------

/// The four backend actions the model may invoke in place of free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GetProducts,
    CreateCart,
    GetCart,
    DeleteCart,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::GetProducts,
        Action::CreateCart,
        Action::GetCart,
        Action::DeleteCart,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::GetProducts => "get_products",
            Action::CreateCart => "create_cart",
            Action::GetCart => "get_cart",
            Action::DeleteCart => "delete_cart",
        }
    }

    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL.iter().copied().find(|a| a.name() == name)
    }

    pub fn definition(&self) -> ToolDefinition {
        match self {
            Action::GetProducts => ToolDefinition {
                name: self.name().into(),
                description: "Busca y filtra productos específicos por tipo, tamaño, color, \
                              categoría, precio, disponibilidad o términos de búsqueda general. \
                              Úsalo cuando el usuario pregunte por productos específicos."
                    .into(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "q": {
                            "type": "string",
                            "description": "Término de búsqueda general para buscar en tipo, categoría y descripción"
                        },
                        "type": {
                            "type": "string",
                            "description": "Tipo específico de producto: camiseta, pantalón, chaqueta, falda, sudadera, etc."
                        },
                        "size": {
                            "type": "string",
                            "description": "Talla del producto: S, M, L, XL, XXL"
                        },
                        "color": {
                            "type": "string",
                            "description": "Color del producto: rojo, azul, verde, negro, blanco, etc."
                        },
                        "category": {
                            "type": "string",
                            "description": "Categoría: casual, formal, deportivo, etc."
                        },
                        "minPrice": { "type": "number", "description": "Precio mínimo" },
                        "maxPrice": { "type": "number", "description": "Precio máximo" },
                        "available": { "type": "boolean", "description": "Si está disponible en stock" }
                    }
                }),
            },
            Action::CreateCart => ToolDefinition {
                name: self.name().into(),
                description: "Crea un carrito con items o agrega items al carrito existente"
                    .into(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "items": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "type": {
                                        "type": "string",
                                        "description": "Tipo de producto (camiseta, pantalón, etc.)"
                                    },
                                    "size": { "type": "string", "description": "Talla: S, M, L, XL, etc." },
                                    "color": { "type": "string", "description": "Color: rojo, azul, negro, etc." },
                                    "category": { "type": "string", "description": "Categoría: casual, formal, deportivo, etc." },
                                    "qty": { "type": "integer", "description": "Cantidad solicitada" }
                                },
                                "required": ["type", "qty"]
                            }
                        }
                    },
                    "required": ["items"]
                }),
            },
            Action::GetCart => ToolDefinition {
                name: self.name().into(),
                description: "Obtiene la información completa del carrito de un usuario".into(),
                parameters: json!({ "type": "object", "properties": {} }),
            },
            Action::DeleteCart => ToolDefinition {
                name: self.name().into(),
                description: "Elimina el carrito actual del usuario (vaciar carrito)".into(),
                parameters: json!({ "type": "object", "properties": {} }),
            },
        }
    }
}

/// The fixed function menu sent with every resolution call.
pub fn action_menu() -> Vec<ToolDefinition> {
    Action::ALL.iter().map(Action::definition).collect()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// What intent resolution produced for one inbound message. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedIntent {
    /// The model named one of the menu actions with arguments.
    Call { action: Action, args: Value },
    /// Free text — either the model answered directly, or its structured
    /// output was unusable and got downgraded ("otro").
    Text(String),
}

/// Resolve a message to an intent. Only transport-level LLM failures are
/// errors; malformed-but-delivered output falls back to the text branch.
pub async fn resolve(agent: &dyn LlmAgent, message: &str) -> Result<ResolvedIntent> {
    let reply = agent.call_with_functions(message, &action_menu()).await?;

    match reply {
        FunctionReply::Call { name, args } => match Action::from_name(&name) {
            Some(action) => Ok(ResolvedIntent::Call { action, args }),
            // Model invented a function we never declared: downgrade.
            None => Ok(ResolvedIntent::Text(String::new())),
        },
        FunctionReply::Text(text) => Ok(ResolvedIntent::Text(
            ai_client::strip_code_blocks(&text).to_string(),
        )),
    }
}
