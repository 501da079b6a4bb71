//! Text-to-Cypher generation through a language model

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::examples::{format_examples, select_examples};
use crate::parser::extract_cypher;
use crate::prompt::PromptBuilder;
use crate::types::PriorAttempt;
use biograph_domain::{GraphSchema, LanguageModel, QueryCandidate};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Longest response excerpt carried in a `NoQueryFound` error
const EXCERPT_CHARS: usize = 200;

/// Generates Cypher candidates for questions no template answers
pub struct QueryGenerator {
    model: Arc<dyn LanguageModel>,
    config: GeneratorConfig,
}

impl QueryGenerator {
    /// Create a generator over a language model
    pub fn new(model: Arc<dyn LanguageModel>, config: GeneratorConfig) -> Self {
        Self { model, config }
    }

    /// Create a generator with default settings
    pub fn with_defaults(model: Arc<dyn LanguageModel>) -> Self {
        Self::new(model, GeneratorConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Name of the underlying model provider
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Assemble the prompt sent to the model
    pub fn build_prompt(
        &self,
        question: &str,
        schema: &GraphSchema,
        prior_attempts: &[PriorAttempt],
    ) -> String {
        let mut builder = PromptBuilder::new(
            question,
            schema.cypher_context(self.config.max_schema_patterns),
        )
        .with_prior_attempts(prior_attempts);

        if self.config.use_few_shot_examples {
            let examples = select_examples(question, self.config.max_few_shot_examples);
            builder = builder.with_examples(format_examples(&examples));
        }

        builder.build()
    }

    /// Ask the model for a Cypher statement answering `question`
    ///
    /// `prior_attempts` are earlier failures for the same question, oldest
    /// first. A response with no recognizable statement yields
    /// [`GeneratorError::NoQueryFound`]; model failures are passed through as
    /// [`GeneratorError::Model`].
    pub fn generate(
        &self,
        question: &str,
        schema: &GraphSchema,
        prior_attempts: &[PriorAttempt],
    ) -> Result<QueryCandidate> {
        let prompt = self.build_prompt(question, schema, prior_attempts);
        debug!(
            model = self.model.name(),
            prompt_chars = prompt.len(),
            prior_attempts = prior_attempts.len(),
            "Requesting Cypher from model"
        );

        let response = self
            .model
            .complete(&prompt, &self.config.completion_options())
            .map_err(|e| {
                warn!(model = self.model.name(), error = %e, "Model call failed");
                GeneratorError::from(e)
            })?;

        match extract_cypher(&response) {
            Some(cypher) => {
                info!(model = self.model.name(), query = %cypher, "Generated Cypher");
                Ok(QueryCandidate::generated(cypher))
            }
            None => {
                warn!(model = self.model.name(), "No Cypher statement in model response");
                Err(GeneratorError::NoQueryFound(excerpt(&response)))
            }
        }
    }
}

fn excerpt(response: &str) -> String {
    let trimmed = response.trim();
    if trimmed.chars().count() <= EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use biograph_domain::{CandidateSource, ModelError};
    use biograph_llm::{LlmError, MockProvider};
    use std::time::Duration;

    fn schema() -> GraphSchema {
        GraphSchema::builtin().unwrap()
    }

    #[test]
    fn test_generate_returns_generated_candidate() {
        let mock = MockProvider::new("```cypher\nMATCH (d:Drug) RETURN d.name LIMIT 10\n```");
        let generator = QueryGenerator::with_defaults(Arc::new(mock.clone()));

        let candidate = generator
            .generate("List some drugs", &schema(), &[])
            .unwrap();

        assert_eq!(candidate.query_text, "MATCH (d:Drug) RETURN d.name LIMIT 10");
        assert_eq!(candidate.source, CandidateSource::Generated);
        assert!(candidate.parameters.is_empty());
        assert!(candidate.template_name.is_none());
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_prompt_carries_schema_examples_and_question() {
        let mock = MockProvider::new("MATCH (g:Gene) RETURN g LIMIT 1");
        let generator = QueryGenerator::with_defaults(Arc::new(mock.clone()));
        generator
            .generate("What drugs target EGFR?", &schema(), &[])
            .unwrap();

        let prompt = &mock.prompts()[0];
        assert!(prompt.contains("## Relationship Types:"));
        assert!(prompt.contains("TARGETS"));
        assert!(prompt.contains("## Example 1:\nQuestion: What drugs target the EGFR gene?"));
        assert!(prompt.contains("## Example 5:"));
        assert!(!prompt.contains("## Example 6:"));
        assert!(prompt.contains("User Question: What drugs target EGFR?"));
    }

    #[test]
    fn test_examples_can_be_disabled() {
        let mock = MockProvider::new("MATCH (g:Gene) RETURN g LIMIT 1");
        let config = GeneratorConfig {
            use_few_shot_examples: false,
            ..GeneratorConfig::default()
        };
        let generator = QueryGenerator::new(Arc::new(mock.clone()), config);
        generator.generate("q", &schema(), &[]).unwrap();
        assert!(!mock.prompts()[0].contains("Example Cypher Queries"));
    }

    #[test]
    fn test_prior_attempts_reach_the_prompt() {
        let mock = MockProvider::new("MATCH (d:Drug) RETURN d.name LIMIT 10");
        let generator = QueryGenerator::with_defaults(Arc::new(mock.clone()));
        let prior = vec![PriorAttempt::new(
            "MATCH (d:Drugz) RETURN d",
            "Unknown node label: Drugz (did you mean Drug?)",
        )];

        generator.generate("List drugs", &schema(), &prior).unwrap();

        let prompt = &mock.prompts()[0];
        assert!(prompt.contains("MATCH (d:Drugz) RETURN d"));
        assert!(prompt.contains("did you mean Drug?"));
    }

    #[test]
    fn test_response_without_query() {
        let mock = MockProvider::new("I am not sure how to answer that.");
        let generator = QueryGenerator::with_defaults(Arc::new(mock));

        let err = generator.generate("q", &schema(), &[]).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::NoQueryFound("I am not sure how to answer that.".to_string())
        );
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_model_errors_pass_through() {
        let mock = MockProvider::default();
        mock.push_error(LlmError::Timeout(Duration::from_secs(60)));
        mock.push_error(LlmError::Communication("connection refused".into()));
        let generator = QueryGenerator::with_defaults(Arc::new(mock));

        let timeout = generator.generate("q", &schema(), &[]).unwrap_err();
        assert_eq!(
            timeout,
            GeneratorError::Model(ModelError::Timeout(Duration::from_secs(60)))
        );
        assert!(!timeout.is_unavailable());

        let down = generator.generate("q", &schema(), &[]).unwrap_err();
        assert!(down.is_unavailable());
    }

    #[test]
    fn test_long_response_excerpt_is_truncated() {
        let text = "x".repeat(500);
        let out = excerpt(&text);
        assert_eq!(out.chars().count(), EXCERPT_CHARS + 3);
        assert!(out.ends_with("..."));
    }
}
