/// Strip markdown code fences from a model response.
///
/// Gemini frequently wraps JSON answers in ```json fences even when told
/// not to; intent parsing needs the bare payload.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
