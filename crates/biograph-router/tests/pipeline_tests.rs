//! End-to-end tests for the query pipeline with scripted collaborators

use biograph_catalog::TemplateCatalog;
use biograph_domain::{
    Collaborator, ExecutionError, GraphExecutor, GraphSchema, Intent, OutputFormat, ParamValue,
    Parameters, PipelineError, QueryCandidate, QueryOptions, QueryType, Row,
};
use biograph_llm::{LlmError, MockProvider};
use biograph_router::{batch_query, BatchRunner, PipelineConfig, QueryPipeline, NO_STATEMENT_MESSAGE};
use biograph_validator::QueryValidator;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const EGFR: &str = "What drugs target EGFR?";
const HISTORY: &str = "Describe the history of biomedicine";
const VALID_DRUG_QUERY: &str =
    "MATCH (d:Drug)-[:TARGETS]->(g:Gene {symbol: 'EGFR'}) RETURN d.name AS drug_name LIMIT 10";

/// In-memory graph that plays back scripted results and records every call
#[derive(Default)]
struct FakeGraph {
    script: Mutex<VecDeque<Result<Vec<Row>, ExecutionError>>>,
    calls: Mutex<Vec<(String, Parameters)>>,
}

impl FakeGraph {
    fn scripted(results: Vec<Result<Vec<Row>, ExecutionError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn calls(&self) -> Vec<(String, Parameters)> {
        self.calls.lock().unwrap().clone()
    }
}

impl GraphExecutor for FakeGraph {
    fn execute(&self, query: &str, parameters: &Parameters) -> Result<Vec<Row>, ExecutionError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), parameters.clone()));
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
    }
}

fn drug_row(name: &str) -> Row {
    serde_json::json!({ "drug_name": name, "approval_status": "approved" })
        .as_object()
        .unwrap()
        .clone()
}

fn pipeline_with(config: PipelineConfig, model: &MockProvider, graph: &Arc<FakeGraph>) -> QueryPipeline {
    QueryPipeline::new(config, Arc::new(model.clone()), graph.clone()).unwrap()
}

fn pipeline(model: &MockProvider, graph: &Arc<FakeGraph>) -> QueryPipeline {
    pipeline_with(PipelineConfig::default(), model, graph)
}

#[test]
fn test_template_question_answered_in_one_attempt() {
    let model = MockProvider::default();
    let graph = FakeGraph::scripted(vec![Ok(vec![drug_row("Gefitinib"), drug_row("Erlotinib")])]);

    let outcome = pipeline(&model, &graph).query(EGFR, QueryOptions::default());

    assert!(outcome.success);
    assert_eq!(outcome.query_type, QueryType::Template);
    assert_eq!(outcome.attempts_used, 1);
    assert_eq!(outcome.intent, Intent::DrugTargetInteraction);
    assert_eq!(outcome.template_name.as_deref(), Some("drugs_targeting_gene"));
    assert_eq!(outcome.row_count(), 2);
    assert!(outcome.answer_text.contains("Gefitinib"));
    assert!(outcome.error.is_none());
    assert_eq!(model.call_count(), 0);

    let calls = graph.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.get("gene_symbol"), Some(&ParamValue::Text("EGFR".into())));
    assert_eq!(calls[0].1.get("limit"), Some(&ParamValue::Integer(10)));
}

#[test]
fn test_unmatched_question_exhausts_attempts() {
    // The mock's reply contains no Cypher at all
    let model = MockProvider::default();
    let graph = FakeGraph::empty();

    let outcome = pipeline(&model, &graph).query(HISTORY, QueryOptions::default());

    assert!(!outcome.success);
    assert_eq!(outcome.intent, Intent::GeneralQuery);
    assert_eq!(outcome.query_type, QueryType::Text2Query);
    assert_eq!(outcome.attempts_used, 3);
    assert_eq!(model.call_count(), 3);
    assert!(graph.calls().is_empty());
    assert!(matches!(
        outcome.error,
        Some(PipelineError::GenerationExhausted { attempts: 3, .. })
    ));
    assert_eq!(outcome.diagnostics.len(), 3);
    assert!(outcome.answer_text.contains("after 3 attempts"));

    // Repair prompts carry the earlier failures
    let prompts = model.prompts();
    assert!(!prompts[0].contains("Previous Attempts"));
    assert!(prompts[1].contains(NO_STATEMENT_MESSAGE));
    assert!(prompts[2].contains("## Attempt 2:"));
}

#[test]
fn test_forced_generation_skips_templates() {
    let model = MockProvider::new(VALID_DRUG_QUERY);
    let graph = FakeGraph::scripted(vec![Ok(vec![drug_row("Gefitinib")])]);
    let pipeline = pipeline(&model, &graph);

    let outcome = pipeline.query(EGFR, QueryOptions::forced_generation());

    assert!(outcome.success);
    assert_eq!(outcome.query_type, QueryType::Text2Query);
    assert!(outcome.template_name.is_none());
    assert_eq!(outcome.final_query.as_deref(), Some(VALID_DRUG_QUERY));
    assert_eq!(model.call_count(), 1);
    assert_eq!(pipeline.metrics().forced_generation, 1);
    assert_eq!(pipeline.metrics().template_matches, 0);
}

#[test]
fn test_zero_rows_is_a_successful_answer() {
    let model = MockProvider::default();
    let graph = FakeGraph::empty();

    let outcome = pipeline(&model, &graph).query(EGFR, QueryOptions::default());

    assert!(outcome.success);
    assert!(outcome.raw_results.is_empty());
    assert_eq!(outcome.answer_text, "No results found for: What drugs target EGFR?");
}

#[test]
fn test_failed_template_falls_back_to_generation() {
    let model = MockProvider::new(VALID_DRUG_QUERY);
    let graph = FakeGraph::scripted(vec![
        Err(ExecutionError::runtime("Type mismatch: expected Integer")),
        Ok(vec![drug_row("Gefitinib")]),
    ]);

    let outcome = pipeline(&model, &graph).query(EGFR, QueryOptions::default());

    assert!(outcome.success);
    assert_eq!(outcome.attempts_used, 2);
    assert_eq!(outcome.query_type, QueryType::Text2Query);
    assert!(outcome.template_name.is_none());
    assert!(matches!(
        outcome.diagnostics.as_slice(),
        [PipelineError::ExecutionError { attempt: 1, .. }]
    ));

    // The generator saw the template query and the database error
    let prompt = &model.prompts()[0];
    assert!(prompt.contains("(gene:Gene {symbol: $gene_symbol})"));
    assert!(prompt.contains("Type mismatch: expected Integer"));
}

#[test]
fn test_unavailable_database_ends_question() {
    let model = MockProvider::new(VALID_DRUG_QUERY);
    let graph = FakeGraph::scripted(vec![Err(ExecutionError::unavailable("Connection refused"))]);

    let outcome = pipeline(&model, &graph).query(EGFR, QueryOptions::default());

    assert!(!outcome.success);
    assert_eq!(outcome.attempts_used, 1);
    assert_eq!(model.call_count(), 0);
    assert_eq!(graph.calls().len(), 1);
    assert!(matches!(
        outcome.error,
        Some(PipelineError::CollaboratorUnavailable {
            collaborator: Collaborator::Database,
            ..
        })
    ));
    assert!(outcome.answer_text.contains("after 1 attempt."));
    assert!(outcome.answer_text.contains("Connection refused"));
}

#[test]
fn test_unavailable_model_ends_question() {
    let model = MockProvider::default();
    model.push_error(LlmError::Communication("connection refused".into()));
    let graph = FakeGraph::empty();

    let outcome = pipeline(&model, &graph).query(HISTORY, QueryOptions::default());

    assert!(!outcome.success);
    assert_eq!(outcome.attempts_used, 1);
    assert_eq!(model.call_count(), 1);
    assert!(matches!(
        outcome.error,
        Some(PipelineError::CollaboratorUnavailable {
            collaborator: Collaborator::LanguageModel,
            ..
        })
    ));
    assert!(!outcome.answer_text.is_empty());
}

#[test]
fn test_invalid_generated_query_is_repaired() {
    let model = MockProvider::scripted([
        "MATCH (d:Medication) RETURN d.name LIMIT 5",
        "MATCH (d:Drug) RETURN d.name AS drug_name LIMIT 5",
    ]);
    let graph = FakeGraph::scripted(vec![Ok(vec![drug_row("Aspirin")])]);

    let outcome = pipeline(&model, &graph).query(HISTORY, QueryOptions::default());

    assert!(outcome.success);
    assert_eq!(outcome.attempts_used, 2);
    // The invalid candidate never reached the database
    assert_eq!(graph.calls().len(), 1);
    assert_eq!(graph.calls()[0].0, "MATCH (d:Drug) RETURN d.name AS drug_name LIMIT 5");
    assert!(matches!(
        outcome.diagnostics.as_slice(),
        [PipelineError::ValidationError { attempt: 1, .. }]
    ));
    assert!(model.prompts()[1].contains("Unknown node label: Medication"));
}

#[test]
fn test_refinement_disabled_allows_one_attempt() {
    let model = MockProvider::default();
    let graph = FakeGraph::empty();
    let config = PipelineConfig {
        enable_refinement: false,
        ..PipelineConfig::default()
    };

    let outcome = pipeline_with(config, &model, &graph).query(HISTORY, QueryOptions::default());

    assert!(!outcome.success);
    assert_eq!(outcome.attempts_used, 1);
    assert_eq!(model.call_count(), 1);
}

#[test]
fn test_validation_disabled_executes_directly() {
    let model = MockProvider::new("MATCH (d:Medication) RETURN d LIMIT 5");
    let graph = FakeGraph::empty();
    let config = PipelineConfig {
        enable_validation: false,
        ..PipelineConfig::default()
    };

    let outcome = pipeline_with(config, &model, &graph).query(HISTORY, QueryOptions::default());

    assert!(outcome.success);
    assert_eq!(outcome.attempts_used, 1);
    assert_eq!(graph.calls().len(), 1);
}

#[test]
fn test_low_confidence_routes_to_generation() {
    let model = MockProvider::new(VALID_DRUG_QUERY);
    let graph = FakeGraph::empty();
    let config = PipelineConfig {
        min_intent_confidence: 0.6,
        ..PipelineConfig::default()
    };

    // Classified with confidence 0.5
    let outcome = pipeline_with(config, &model, &graph).query(EGFR, QueryOptions::default());

    assert!(outcome.success);
    assert_eq!(outcome.query_type, QueryType::Text2Query);
    assert_eq!(model.call_count(), 1);
}

#[test]
fn test_missing_template_parameter_is_recorded() {
    let model = MockProvider::new(VALID_DRUG_QUERY);
    let graph = FakeGraph::empty();

    let outcome = pipeline(&model, &graph).query("Which drugs inhibit this receptor?", QueryOptions::default());

    assert!(outcome.success);
    assert_eq!(outcome.query_type, QueryType::Text2Query);
    assert_eq!(
        outcome.diagnostics.first(),
        Some(&PipelineError::TemplateParameterMissing {
            template: "drugs_targeting_gene".into(),
            missing: vec!["gene_symbol".into()],
        })
    );
}

#[test]
fn test_ambiguous_classification_is_recorded() {
    let model = MockProvider::new(VALID_DRUG_QUERY);
    let graph = FakeGraph::empty();

    let outcome = pipeline(&model, &graph).query("Which target is best?", QueryOptions::default());

    assert_eq!(outcome.intent, Intent::TargetIdentification);
    assert_eq!(
        outcome.diagnostics.first(),
        Some(&PipelineError::ClassificationAmbiguity {
            chosen: Intent::TargetIdentification,
            tied_with: vec![Intent::DrugTargetInteraction],
        })
    );
}

#[test]
fn test_json_output_is_a_document() {
    let model = MockProvider::default();
    let graph = FakeGraph::scripted(vec![Ok(vec![drug_row("Gefitinib")])]);

    let outcome = pipeline(&model, &graph).query(EGFR, QueryOptions::with_format(OutputFormat::Json));

    let document: serde_json::Value = serde_json::from_str(&outcome.answer_text).unwrap();
    assert_eq!(document["question"], EGFR);
    assert_eq!(document["count"], 1);
    assert_eq!(document["results"][0]["drug_name"], "Gefitinib");
}

#[test]
fn test_suggestions_rank_matching_template_first() {
    let pipeline = pipeline(&MockProvider::default(), &FakeGraph::empty());

    let suggestions = pipeline.get_suggestions(EGFR);
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= pipeline.config().suggestion_limit);
    assert_eq!(suggestions[0].template_name, "drugs_targeting_gene");

    assert!(pipeline.get_suggestions(HISTORY).is_empty());
}

#[test]
fn test_metrics_track_outcomes() {
    let model = MockProvider::default();
    let graph = FakeGraph::empty();
    let pipeline = pipeline(&model, &graph);

    pipeline.query(EGFR, QueryOptions::default());
    pipeline.query(HISTORY, QueryOptions::default());

    let metrics = pipeline.metrics();
    assert_eq!(metrics.total_queries, 2);
    assert_eq!(metrics.template_matches, 1);
    assert_eq!(metrics.template_hits, 1);
    assert_eq!(metrics.successes, 1);
    assert_eq!(metrics.failures, 1);
    assert_eq!(metrics.total_attempts, 4);
    assert_eq!(metrics.by_intent[&Intent::GeneralQuery], 1);

    pipeline.reset_metrics();
    assert_eq!(pipeline.metrics().total_queries, 0);
}

#[test]
fn test_outcome_invariants_hold_for_varied_questions() {
    let model = MockProvider::default();
    let graph = FakeGraph::empty();
    let pipeline = pipeline(&model, &graph);
    let max = pipeline.config().max_iterations;

    for question in [
        EGFR,
        HISTORY,
        "",
        "Find drugs with similar targets to Imatinib",
        "What genes are associated with breast cancer?",
        "Which drugs treat Rheumatoid Arthritis?",
        "??",
    ] {
        let outcome = pipeline.query(question, QueryOptions::default());
        assert!(outcome.attempts_used >= 1 && outcome.attempts_used <= max, "{}", question);
        assert!(!outcome.answer_text.is_empty(), "{}", question);
        assert_eq!(outcome.success, outcome.error.is_none(), "{}", question);
    }
}

#[test]
fn test_builtin_templates_validate_against_builtin_schema() {
    let schema = GraphSchema::builtin().unwrap();
    let validator = QueryValidator::default();

    for template in TemplateCatalog::builtin().iter() {
        let parameters: Parameters = template
            .parameters
            .iter()
            .map(|spec| {
                let value = spec
                    .default
                    .clone()
                    .unwrap_or_else(|| ParamValue::Text("Example".into()));
                (spec.name.clone(), value)
            })
            .collect();
        let candidate = QueryCandidate::from_template(template, parameters);

        let outcome = validator.validate(&candidate, &schema);
        assert!(
            outcome.valid,
            "{} failed validation: {}",
            template.name,
            outcome.error_summary()
        );
    }
}

#[test]
fn test_custom_schema_and_catalog() {
    let schema = GraphSchema::builtin().unwrap();
    let catalog = TemplateCatalog::new(
        TemplateCatalog::builtin()
            .iter()
            .filter(|t| t.intent != Intent::DrugTargetInteraction)
            .cloned()
            .collect(),
    )
    .unwrap();
    let model = MockProvider::new(VALID_DRUG_QUERY);
    let graph = FakeGraph::empty();

    let pipeline = pipeline(&model, &graph).with_schema(schema).with_catalog(catalog);
    assert_eq!(pipeline.catalog().len(), 18);

    let outcome = pipeline.query(EGFR, QueryOptions::default());
    assert!(outcome.success);
    assert_ne!(outcome.template_name.as_deref(), Some("drugs_targeting_gene"));
}

#[tokio::test]
async fn test_batch_preserves_order() {
    let model = MockProvider::default();
    let graph = FakeGraph::empty();
    let pipeline = Arc::new(pipeline(&model, &graph));

    let questions = vec![
        EGFR.to_string(),
        HISTORY.to_string(),
        "Which drugs treat Rheumatoid Arthritis?".to_string(),
    ];
    let outcomes = BatchRunner::new(pipeline.clone())
        .with_workers(2)
        .run(questions.clone(), QueryOptions::default())
        .await;

    assert_eq!(outcomes.len(), questions.len());
    for (outcome, question) in outcomes.iter().zip(&questions) {
        assert_eq!(&outcome.question, question);
    }
    let successes: Vec<bool> = outcomes.iter().map(|o| o.success).collect();
    assert_eq!(successes, vec![true, false, true]);
    assert_eq!(pipeline.metrics().total_queries, 3);
}

#[tokio::test]
async fn test_batch_query_with_default_workers() {
    let model = MockProvider::default();
    let graph = FakeGraph::empty();
    let pipeline = Arc::new(pipeline(&model, &graph));

    let outcomes = batch_query(pipeline, Vec::new(), QueryOptions::default()).await;
    assert!(outcomes.is_empty());
}

#[tokio::test]
async fn test_run_one_uses_blocking_pool() {
    let model = MockProvider::default();
    let graph = FakeGraph::empty();
    let runner = BatchRunner::new(Arc::new(pipeline(&model, &graph)));
    assert_eq!(runner.workers(), 4);

    let outcome = runner.run_one(EGFR.to_string(), QueryOptions::default()).await;
    assert!(outcome.success);
    assert_eq!(outcome.query_type, QueryType::Template);
}
