//! Prompt construction for Cypher generation

use crate::types::PriorAttempt;

/// Builds the generation prompt
pub struct PromptBuilder {
    question: String,
    schema_context: String,
    examples: Option<String>,
    prior_attempts: Vec<PriorAttempt>,
}

impl PromptBuilder {
    /// Create a prompt builder for a question and schema context
    pub fn new(question: impl Into<String>, schema_context: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            schema_context: schema_context.into(),
            examples: None,
            prior_attempts: Vec::new(),
        }
    }

    /// Add a formatted few-shot example section
    pub fn with_examples(mut self, examples: String) -> Self {
        if !examples.trim().is_empty() {
            self.examples = Some(examples);
        }
        self
    }

    /// Add failed attempts the model should repair
    pub fn with_prior_attempts(mut self, attempts: &[PriorAttempt]) -> Self {
        self.prior_attempts = attempts.to_vec();
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role and schema
        prompt.push_str(ROLE);
        prompt.push_str("\n\n");
        prompt.push_str(&self.schema_context);
        prompt.push_str("\n\n");

        // 2. Guidelines
        prompt.push_str(GUIDELINES);
        prompt.push_str("\n\n");

        // 3. Few-shot examples
        if let Some(examples) = &self.examples {
            prompt.push_str(examples);
            prompt.push('\n');
        }

        // 4. Earlier failures, oldest first
        if !self.prior_attempts.is_empty() {
            prompt.push_str("# Previous Attempts (all failed, do not repeat them):\n");
            for (i, attempt) in self.prior_attempts.iter().enumerate() {
                prompt.push_str(&format!(
                    "\n## Attempt {}:\nQuery:\n{}\nError:\n{}\n",
                    i + 1,
                    attempt.query.trim(),
                    attempt.error
                ));
            }
            prompt.push('\n');
            prompt.push_str(REPAIR_INSTRUCTIONS);
            prompt.push_str("\n\n");
        }

        // 5. The question
        prompt.push_str(&format!("User Question: {}\n\n", self.question.trim()));
        prompt.push_str(OUTPUT_REMINDER);

        prompt
    }
}

const ROLE: &str =
    "You are an expert at generating Cypher queries for the QIAGEN Biomedical Knowledge Base (BKB).";

const GUIDELINES: &str = r#"## Guidelines for Generating Cypher Queries:

1. **Always use LIMIT**: Include a LIMIT clause (default 10-20) unless the user asks for all results
2. **Use the schema**: Only use node labels, relationship types and properties listed above
3. **Match patterns**: Use appropriate MATCH patterns based on the schema
4. **Handle synonyms**: Use WHERE clauses with toLower() for case-insensitive matching
5. **Include context**: Return relevant context (e.g., gene symbols, disease names, mechanisms)
6. **Optimize queries**: Avoid cartesian products; use WHERE clauses to filter effectively
7. **Read only**: Never use CREATE, MERGE, DELETE, SET, REMOVE or DROP

## Query Structure:
- Start with MATCH to find patterns
- Use WHERE for filtering
- Use WITH for intermediate aggregations
- Use RETURN to specify output
- Use ORDER BY for sorting
- Always end with LIMIT"#;

const REPAIR_INSTRUCTIONS: &str = r#"Write a corrected query that:
1. Fixes every error listed above
2. Still answers the user's question
3. Uses only names from the schema"#;

const OUTPUT_REMINDER: &str = "Generate only the Cypher query, no explanations.\nCypher:";
