use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Tool Definition
// =============================================================================

/// A callable action declared to the model: name, human description and a
/// JSON-schema object describing the arguments.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

// =============================================================================
// Request wire types (generateContent)
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolConfig>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::Text { text: text.into() }],
            }],
            tools: None,
            generation_config: None,
        }
    }

    pub fn tools(mut self, declarations: Vec<ToolDefinition>) -> Self {
        self.tools = Some(vec![ToolConfig {
            function_declarations: declarations,
        }]);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config = Some(GenerationConfig {
            temperature: Some(temperature),
        });
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ToolConfig {
    #[serde(rename = "functionDeclarations")]
    pub function_declarations: Vec<ToolDefinition>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

// =============================================================================
// Response wire types
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    pub content: Content,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let joined: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }

    /// First function call in the first candidate, if any.
    pub fn function_call(&self) -> Option<&FunctionCall> {
        self.candidates.first()?.content.parts.iter().find_map(|part| match part {
            Part::FunctionCall { function_call } => Some(function_call),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn function_call_part_deserializes() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "functionCall": {
                            "name": "get_products",
                            "args": {"type": "camiseta", "color": "azul"}
                        }
                    }]
                }
            }]
        });

        let resp: GenerateResponse = serde_json::from_value(raw).unwrap();
        let call = resp.function_call().expect("function call present");
        assert_eq!(call.name, "get_products");
        assert_eq!(call.args["color"], "azul");
        assert!(resp.text().is_none());
    }

    #[test]
    fn text_parts_concatenate() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "Hola"}, {"text": ", ¿en qué ayudo?"}]
                }
            }]
        });

        let resp: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.text().unwrap(), "Hola, ¿en qué ayudo?");
    }

    #[test]
    fn tools_serialize_as_function_declarations() {
        let request = GenerateRequest::user_text("hola").tools(vec![ToolDefinition {
            name: "get_cart".into(),
            description: "Obtiene el carrito".into(),
            parameters: json!({"type": "object", "properties": {}}),
        }]);

        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(
            wire["tools"][0]["functionDeclarations"][0]["name"],
            "get_cart"
        );
        assert!(wire.get("generationConfig").is_none());
    }
}
