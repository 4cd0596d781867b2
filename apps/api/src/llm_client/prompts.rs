// Shared prompt fragments. Each operation that calls the LLM keeps its own
// prompts.rs alongside it and composes these where needed.

/// Appended to system prompts whose reply is decoded as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to system prompts whose reply is used verbatim as text.
pub const TEXT_ONLY_INSTRUCTION: &str = "\
    Output ONLY the requested text. \
    No preamble such as \"Here is the text\", no explanations, no surrounding quotes.";
