//! LLM prompts used by the recommender.

/// Collection of prompts used for recommendations.
pub struct Prompts;

impl Prompts {
    /// Prompt asking the model for songs similar to the artists in `{input}`.
    pub fn song_recommendation() -> &'static str {
        "Given the input: {input}, recommend 5 songs similar to the artists mentioned."
    }

    /// Substitute `{input}` in a template verbatim.
    pub fn render(template: &str, input: &str) -> String {
        template.replace("{input}", input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_are_not_empty() {
        assert!(!Prompts::song_recommendation().is_empty());
        assert!(Prompts::song_recommendation().contains("{input}"));
    }

    #[test]
    fn test_render_substitutes_verbatim() {
        let rendered = Prompts::render(Prompts::song_recommendation(), "I like {Drake} & \"Future\"");
        assert_eq!(
            rendered,
            "Given the input: I like {Drake} & \"Future\", recommend 5 songs similar to the artists mentioned."
        );
    }
}
