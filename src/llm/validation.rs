use crate::config::TranslationConfig;

/// Why a generative translation was not accepted
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Empty or a bare placeholder such as an empty code fence
    Empty,
    /// Much shorter than the source, usually a truncated or summarised answer
    TooShort { output_chars: usize, source_chars: usize },
    /// A known refusal message
    Refusal(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Empty => write!(f, "empty output"),
            RejectReason::TooShort {
                output_chars,
                source_chars,
            } => write!(
                f,
                "output too short ({} chars for {} source chars)",
                output_chars, source_chars
            ),
            RejectReason::Refusal(msg) => write!(f, "refusal: {}", msg),
        }
    }
}

/// Accept or reject a generative translation of `source`.
///
/// Accepted output is returned with any surrounding code fence removed.
pub fn check_generative_output(
    output: &str,
    source: &str,
    config: &TranslationConfig,
) -> Result<String, RejectReason> {
    let trimmed = output.trim();
    if config
        .placeholder_outputs
        .iter()
        .any(|p| p.trim() == trimmed)
    {
        return Err(RejectReason::Empty);
    }

    let text = unwrap_fence(trimmed);
    if text.is_empty() {
        return Err(RejectReason::Empty);
    }

    let output_chars = text.chars().count();
    let source_chars = source.trim().chars().count();
    if (output_chars as f64) < source_chars as f64 * config.min_length_ratio {
        return Err(RejectReason::TooShort {
            output_chars,
            source_chars,
        });
    }

    if let Some(refusal) = config
        .refusal_phrases
        .iter()
        .find(|r| !r.is_empty() && text.contains(r.as_str()))
    {
        return Err(RejectReason::Refusal(refusal.clone()));
    }

    Ok(text.to_string())
}

/// Strip a ``` fence the model wrapped its answer in
fn unwrap_fence(text: &str) -> &str {
    let inner = text.strip_prefix("```").unwrap_or(text);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}
