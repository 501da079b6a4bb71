//! The hybrid router: classify, match, refine, synthesize

use crate::config::{ConfigError, PipelineConfig};
use crate::metrics::PipelineMetrics;
use crate::refinement::{CandidateGenerator, CandidateValidator, RefinementLoop, RefinementReport};
use biograph_catalog::{IntentClassifier, NoMatch, Suggestion, TemplateCatalog, TemplateMatcher};
use biograph_domain::{
    ClassificationResult, GraphExecutor, GraphSchema, LanguageModel, PipelineError, QueryCandidate,
    QueryOptions, QueryOutcome, QueryType, ValidationOutcome,
};
use biograph_generator::{GeneratorError, PriorAttempt, QueryGenerator};
use biograph_synthesizer::ResultSynthesizer;
use biograph_validator::QueryValidator;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Answers natural-language questions against the knowledge graph
///
/// Every question is first classified and matched against the template
/// catalog. A matched template is validated and executed directly; anything
/// else (or a failing template) goes to the language model through the
/// refinement loop. [`QueryPipeline::query`] never fails: problems end up in
/// the returned [`QueryOutcome`].
///
/// The pipeline holds only read-only state apart from its metrics, so one
/// instance can serve many threads behind an `Arc`.
pub struct QueryPipeline {
    config: PipelineConfig,
    schema: Arc<GraphSchema>,
    catalog: Arc<TemplateCatalog>,
    classifier: IntentClassifier,
    validator: QueryValidator,
    generator: QueryGenerator,
    synthesizer: ResultSynthesizer,
    executor: Arc<dyn GraphExecutor>,
    metrics: Mutex<PipelineMetrics>,
}

impl QueryPipeline {
    /// Build a pipeline over the built-in schema and catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the built-in schema
    /// fails to load.
    pub fn new(
        config: PipelineConfig,
        model: Arc<dyn LanguageModel>,
        executor: Arc<dyn GraphExecutor>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let schema = GraphSchema::builtin()?;

        info!(
            model = model.name(),
            max_iterations = config.max_iterations,
            validation = config.enable_validation,
            refinement = config.enable_refinement,
            "Query pipeline initialized"
        );

        Ok(Self {
            schema: Arc::new(schema),
            catalog: Arc::new(TemplateCatalog::builtin()),
            classifier: IntentClassifier::new(),
            validator: QueryValidator::new(config.validator.clone()),
            generator: QueryGenerator::new(model, config.generator.clone()),
            synthesizer: ResultSynthesizer::new(config.synthesizer.clone()),
            executor,
            metrics: Mutex::new(PipelineMetrics::new()),
            config,
        })
    }

    /// Replace the schema used for prompts and validation
    pub fn with_schema(mut self, schema: GraphSchema) -> Self {
        self.schema = Arc::new(schema);
        self
    }

    /// Replace the template catalog
    pub fn with_catalog(mut self, catalog: TemplateCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Graph schema in use
    pub fn schema(&self) -> &GraphSchema {
        &self.schema
    }

    /// Template catalog in use
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Classify a question without answering it
    pub fn classify(&self, question: &str) -> ClassificationResult {
        self.classifier.classify(question)
    }

    /// Top templates for a question, limited by `suggestion_limit`
    pub fn get_suggestions(&self, question: &str) -> Vec<Suggestion> {
        self.suggestions(question, self.config.suggestion_limit)
    }

    /// Top `limit` templates for a question
    pub fn suggestions(&self, question: &str, limit: usize) -> Vec<Suggestion> {
        TemplateMatcher::new(&self.catalog, self.config.matcher.clone()).get_suggestions(question, limit)
    }

    /// Snapshot of the metrics collected so far
    pub fn metrics(&self) -> PipelineMetrics {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear collected metrics
    pub fn reset_metrics(&self) {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset();
    }

    /// Answer one question
    ///
    /// Blocks on the language model and database. Never panics on
    /// collaborator failure and never returns an empty `answer_text`.
    pub fn query(&self, question: &str, options: QueryOptions) -> QueryOutcome {
        info!(question = %question, format = options.format.as_str(), "Processing question");

        let classification = self.classifier.classify(question);
        let mut diagnostics = Vec::new();

        if classification.is_ambiguous() {
            warn!(
                chosen = %classification.intent,
                tied = ?classification.tied_with,
                "Ambiguous intent classification"
            );
            diagnostics.push(PipelineError::ClassificationAmbiguity {
                chosen: classification.intent,
                tied_with: classification.tied_with.clone(),
            });
        }

        let initial = self.select_template(question, &classification, options, &mut diagnostics);
        let template_selected = initial.is_some();

        let generator = SchemaBoundGenerator {
            generator: &self.generator,
            schema: &self.schema,
        };
        let validator = SchemaBoundValidator {
            validator: &self.validator,
            schema: &self.schema,
        };
        let validator: Option<&dyn CandidateValidator> = if self.config.enable_validation {
            Some(&validator)
        } else {
            None
        };

        let refinement = RefinementLoop::new(
            &generator,
            validator,
            self.executor.as_ref(),
            self.config.attempt_budget(),
        );
        let report = refinement.run(question, initial);

        let outcome = self.build_outcome(question, options, &classification, diagnostics, report);
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record_outcome(&outcome, template_selected, options.force_generation);

        info!(
            success = outcome.success,
            query_type = %outcome.query_type,
            attempts = outcome.attempts_used,
            rows = outcome.row_count(),
            "Question finished"
        );
        outcome
    }

    /// Failed outcome for a question whose worker stopped before answering
    pub(crate) fn internal_failure(&self, question: &str, message: String) -> QueryOutcome {
        let classification = self.classifier.classify(question);
        let error = PipelineError::Internal { message };
        let outcome = QueryOutcome {
            question: question.to_string(),
            answer_text: self.synthesizer.explain_failure(question, &error, 0),
            raw_results: Vec::new(),
            query_type: QueryType::Text2Query,
            attempts_used: 0,
            success: false,
            intent: classification.intent,
            confidence: classification.confidence,
            template_name: None,
            final_query: None,
            error: Some(error),
            diagnostics: Vec::new(),
        };
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record_outcome(&outcome, false, false);
        outcome
    }

    fn select_template(
        &self,
        question: &str,
        classification: &ClassificationResult,
        options: QueryOptions,
        diagnostics: &mut Vec<PipelineError>,
    ) -> Option<QueryCandidate> {
        if options.force_generation {
            info!("Generation forced, skipping template matcher");
            return None;
        }
        if classification.confidence < self.config.min_intent_confidence {
            info!(
                intent = %classification.intent,
                confidence = classification.confidence,
                threshold = self.config.min_intent_confidence,
                "Low classification confidence, routing to generation"
            );
            return None;
        }

        let matcher = TemplateMatcher::new(&self.catalog, self.config.matcher.clone());
        match matcher.find_match(question, classification) {
            Ok(matched) => Some(QueryCandidate::from_template(matched.template, matched.parameters)),
            Err(NoMatch::MissingParameters { template, missing }) => {
                diagnostics.push(PipelineError::TemplateParameterMissing { template, missing });
                None
            }
            Err(reason) => {
                debug!(reason = %reason, "No template selected");
                None
            }
        }
    }

    fn build_outcome(
        &self,
        question: &str,
        options: QueryOptions,
        classification: &ClassificationResult,
        mut diagnostics: Vec<PipelineError>,
        report: RefinementReport,
    ) -> QueryOutcome {
        diagnostics.extend(report.diagnostics);

        match report.result {
            Ok(success) => {
                let candidate = success.candidate;
                let query_type = query_type_of(&candidate);
                QueryOutcome {
                    question: question.to_string(),
                    answer_text: self
                        .synthesizer
                        .synthesize_rows(&success.rows, question, options.format),
                    raw_results: success.rows,
                    query_type,
                    attempts_used: report.attempts_used,
                    success: true,
                    intent: classification.intent,
                    confidence: classification.confidence,
                    template_name: candidate.template_name,
                    final_query: Some(candidate.query_text),
                    error: None,
                    diagnostics,
                }
            }
            Err(error) => {
                let last = report.last_candidate;
                QueryOutcome {
                    question: question.to_string(),
                    answer_text: self
                        .synthesizer
                        .explain_failure(question, &error, report.attempts_used),
                    raw_results: Vec::new(),
                    query_type: last.as_ref().map_or(QueryType::Text2Query, query_type_of),
                    attempts_used: report.attempts_used,
                    success: false,
                    intent: classification.intent,
                    confidence: classification.confidence,
                    template_name: None,
                    final_query: last.map(|c| c.query_text),
                    error: Some(error),
                    diagnostics,
                }
            }
        }
    }
}

fn query_type_of(candidate: &QueryCandidate) -> QueryType {
    if candidate.is_template() {
        QueryType::Template
    } else {
        QueryType::Text2Query
    }
}

/// Generator with the pipeline's schema bound in
struct SchemaBoundGenerator<'a> {
    generator: &'a QueryGenerator,
    schema: &'a GraphSchema,
}

impl CandidateGenerator for SchemaBoundGenerator<'_> {
    fn generate(
        &self,
        question: &str,
        prior_attempts: &[PriorAttempt],
    ) -> Result<QueryCandidate, GeneratorError> {
        self.generator.generate(question, self.schema, prior_attempts)
    }
}

/// Validator with the pipeline's schema bound in
struct SchemaBoundValidator<'a> {
    validator: &'a QueryValidator,
    schema: &'a GraphSchema,
}

impl CandidateValidator for SchemaBoundValidator<'_> {
    fn validate(&self, candidate: &QueryCandidate) -> ValidationOutcome {
        self.validator.validate(candidate, self.schema)
    }
}
