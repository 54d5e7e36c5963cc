//! Second LLM pass: phrase an executed action's result as a natural-language
//! reply, constrained to the data the backend actually returned.
//!
//! Prompt builders are pure functions so their wording can be asserted in
//! tests without touching an agent.

use serde_json::Value;

use crate::error::Result;
use crate::intent::{Action, LlmAgent};
use crate::types::{CartView, DeleteReceipt, Product};

/// At most this many products are spelled out in the prompt; the rest are
/// summarized as a count so the context stays small.
const PROMPT_PRODUCT_CAP: usize = 5;

/// Result of executing one resolved action, ready for phrasing.
#[derive(Debug, Clone)]
pub enum ActionResult {
    Products(Vec<Product>),
    Cart(CartView),
    Deleted(DeleteReceipt),
}

/// Build the phrasing prompt for a product listing. The instructions pin the
/// model to the supplied rows: it must not invent products, and an empty
/// result set becomes a suggestion to relax the filters.
pub fn listing_prompt(user_args: &Value, products: &[Product]) -> String {
    let mut prompt = String::from(
        "Eres un asistente de ventas de una tienda de ropa. \
         Responde en español, de forma breve y amable.\n\n",
    );

    prompt.push_str("ANÁLISIS DE RESULTADOS ESPECÍFICOS:\n");
    prompt.push_str(&format!("Criterios de búsqueda del usuario: {user_args}\n"));
    prompt.push_str(&format!("Total de productos encontrados: {}\n", products.len()));

    if products.is_empty() {
        prompt.push_str(
            "\nNo se encontró ningún producto con esos criterios. \
             Dilo claramente y sugiere al usuario relajar los filtros \
             (otro color, otra talla u otro rango de precio). \
             NO inventes productos.\n",
        );
        return prompt;
    }

    prompt.push_str("\nProductos encontrados (usa SOLO estos datos, no inventes nada):\n");
    for product in products.iter().take(PROMPT_PRODUCT_CAP) {
        prompt.push_str(&format!(
            "- {} | talla {} | color {} | categoría {} | precio {} | {}\n",
            product.product_type,
            product.size,
            product.color,
            product.category,
            product.price,
            if product.available {
                "disponible"
            } else {
                "agotado"
            },
        ));
    }
    if products.len() > PROMPT_PRODUCT_CAP {
        prompt.push_str(&format!(
            "... y {} productos más que coinciden.\n",
            products.len() - PROMPT_PRODUCT_CAP
        ));
    }

    prompt.push_str(
        "\nResume estos resultados para el usuario. Menciona precios y \
         disponibilidad. Limita tu respuesta a los productos listados arriba.\n",
    );
    prompt
}

/// Build the phrasing prompt for a cart view (after create, update or read).
pub fn cart_prompt(action: Action, cart: &CartView) -> String {
    let heading = match action {
        Action::CreateCart => "El carrito del usuario quedó así después de la operación:",
        _ => "Contenido actual del carrito del usuario:",
    };

    let mut prompt = String::from(
        "Eres un asistente de ventas de una tienda de ropa. \
         Responde en español, de forma breve y amable.\n\n",
    );
    prompt.push_str(heading);
    prompt.push('\n');

    for item in &cart.items {
        prompt.push_str(&format!(
            "- {} x {} ({}, talla {}) a {} cada uno\n",
            item.qty, item.product.product_type, item.product.color, item.product.size,
            item.product.price,
        ));
    }
    prompt.push_str(&format!(
        "Total: {} | Líneas: {}\n\n\
         Describe el carrito usando SOLO estos datos. No inventes productos \
         ni precios.\n",
        cart.total, cart.item_count,
    ));
    prompt
}

/// Build the phrasing prompt confirming a cart deletion.
pub fn deletion_prompt(receipt: &DeleteReceipt) -> String {
    format!(
        "Eres un asistente de ventas de una tienda de ropa. \
         Responde en español, de forma breve y amable.\n\n\
         El carrito del usuario fue eliminado ({}). Confírmaselo en una frase \
         y ofrécete a ayudarle a armar uno nuevo.\n",
        receipt.message,
    )
}

/// Phrase an executed action's outcome through the agent.
pub async fn compose(
    agent: &dyn LlmAgent,
    action: Action,
    args: &Value,
    result: &ActionResult,
) -> Result<String> {
    let prompt = match result {
        ActionResult::Products(products) => listing_prompt(args, products),
        ActionResult::Cart(cart) => cart_prompt(action, cart),
        ActionResult::Deleted(receipt) => deletion_prompt(receipt),
    };

    Ok(agent.generate(&prompt).await?)
}
