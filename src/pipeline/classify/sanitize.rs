//! Post-LLM output cleanup before JSON parsing.

use std::sync::LazyLock;

use regex::Regex;

static THINK_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

static SPECIAL_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\|[a-z_]+\|>|<unused\d+>").expect("valid regex"));

/// Strip model artifacts from raw LLM output.
///
/// Removes `<think>...</think>` reasoning blocks, an unterminated leading
/// `<think>` block, and stray chat-template tokens such as `<|im_end|>`.
pub fn sanitize_llm_output(raw: &str) -> String {
    let mut text = THINK_BLOCK_RE.replace_all(raw, "").to_string();

    // Truncated reasoning: everything after an unclosed <think> is noise,
    // unless a JSON object follows it. A <think> after the first `{` is
    // answer content, not a reasoning block.
    let unclosed = text
        .find("<think>")
        .filter(|&idx| !text[..idx].contains('{'));
    if let Some(idx) = unclosed {
        text = match text[idx..].find('{') {
            Some(brace) => format!("{}{}", &text[..idx], &text[idx + brace..]),
            None => text[..idx].to_string(),
        };
    }

    text = SPECIAL_TOKEN_RE.replace_all(&text, "").to_string();
    text.trim().to_string()
}
