//! Prompt chain: the fixed recommendation prompt bound to a model.

use crate::error::Result;
use crate::llm::{Completion, CompletionModel, Prompts};

/// Renders the recommendation template and submits it to a model.
pub struct PromptChain<M> {
    model: M,
    template: &'static str,
}

impl<M: CompletionModel> PromptChain<M> {
    /// Bind the song recommendation prompt to `model`.
    pub fn new(model: M) -> Self {
        Self {
            model,
            template: Prompts::song_recommendation(),
        }
    }

    /// The prompt that would be sent for `user_text`.
    pub fn render(&self, user_text: &str) -> String {
        Prompts::render(self.template, user_text)
    }

    /// Run the chain once. Model errors are returned as-is.
    pub async fn run(&self, user_text: &str) -> Result<Completion> {
        let prompt = self.render(user_text);
        tracing::debug!(prompt_len = prompt.len(), "running prompt chain");
        self.model.complete(&prompt).await
    }
}
