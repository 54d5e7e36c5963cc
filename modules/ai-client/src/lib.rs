pub mod error;
pub mod gemini;
pub mod util;

pub use error::AiError;
pub use gemini::{FunctionReply, Gemini, ToolDefinition};
pub use util::strip_code_blocks;
