//! Bounded validate → execute → repair loop
//!
//! The loop is an explicit state machine:
//!
//! ```text
//! INIT ──► VALIDATING ──► EXECUTING ──► SUCCESS
//!              │              │
//!              ▼              ▼
//!            RETRY ◄──────────┘
//!              │
//!              ├──► VALIDATING   (fresh candidate, attempt + 1)
//!              └──► EXHAUSTED    (attempt budget spent)
//! ```
//!
//! An unreachable collaborator moves any state to ABORTED. Every attempt,
//! including one that starts from a template, counts against the budget.

use biograph_domain::{
    Collaborator, ExecutionError, ErrorCategory, GraphExecutor, PipelineError, QueryCandidate, Row,
    ValidationIssue, ValidationOutcome, ValidationWarning,
};
use biograph_generator::{GeneratorError, PriorAttempt};
use tracing::{debug, info, warn};

/// Message recorded when a model reply holds no statement
pub const NO_STATEMENT_MESSAGE: &str = "model response contained no Cypher statement";

/// Source of fresh candidates for a question
pub trait CandidateGenerator {
    /// Produce a candidate, given earlier failed attempts (oldest first)
    fn generate(
        &self,
        question: &str,
        prior_attempts: &[PriorAttempt],
    ) -> Result<QueryCandidate, GeneratorError>;
}

/// Static check applied before execution
pub trait CandidateValidator {
    /// Validate a candidate
    fn validate(&self, candidate: &QueryCandidate) -> ValidationOutcome;
}

/// Named loop states, recorded in visiting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStage {
    /// Waiting for the first candidate
    Init,
    /// Checking a candidate statically
    Validating,
    /// Running a candidate against the database
    Executing,
    /// Deciding whether another attempt is allowed
    Retry,
    /// A candidate executed
    Success,
    /// The attempt budget is spent
    Exhausted,
    /// A collaborator is unavailable
    Aborted,
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSuccess {
    /// Candidate that executed
    pub candidate: QueryCandidate,
    /// Rows it returned, possibly none
    pub rows: Vec<Row>,
    /// Validation warnings for that candidate
    pub warnings: Vec<ValidationWarning>,
}

/// Everything the loop learned about one question
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementReport {
    /// Success data, or the terminal error
    pub result: Result<LoopSuccess, PipelineError>,
    /// Attempts consumed, never more than the budget
    pub attempts_used: usize,
    /// Recoverable failures, in order
    pub diagnostics: Vec<PipelineError>,
    /// Last candidate the loop handled
    pub last_candidate: Option<QueryCandidate>,
    /// States visited
    pub stages: Vec<LoopStage>,
}

impl RefinementReport {
    /// Whether a candidate executed
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

enum State {
    Init(Option<QueryCandidate>),
    Validating(QueryCandidate),
    Executing(QueryCandidate, Vec<ValidationWarning>),
    Retry,
    Success(LoopSuccess),
    Exhausted,
    Aborted(PipelineError),
}

impl State {
    fn stage(&self) -> LoopStage {
        match self {
            State::Init(_) => LoopStage::Init,
            State::Validating(_) => LoopStage::Validating,
            State::Executing(..) => LoopStage::Executing,
            State::Retry => LoopStage::Retry,
            State::Success(_) => LoopStage::Success,
            State::Exhausted => LoopStage::Exhausted,
            State::Aborted(_) => LoopStage::Aborted,
        }
    }
}

/// The refinement loop over its three collaborators
pub struct RefinementLoop<'a> {
    generator: &'a dyn CandidateGenerator,
    validator: Option<&'a dyn CandidateValidator>,
    executor: &'a dyn GraphExecutor,
    max_attempts: usize,
}

/// Mutable bookkeeping for one run
struct Run<'q> {
    question: &'q str,
    attempt: usize,
    prior: Vec<PriorAttempt>,
    diagnostics: Vec<PipelineError>,
    last_candidate: Option<QueryCandidate>,
    last_error: String,
}

impl<'a> RefinementLoop<'a> {
    /// Create a loop allowing `max_attempts` attempts (at least one)
    ///
    /// Without a validator, candidates go straight to execution.
    pub fn new(
        generator: &'a dyn CandidateGenerator,
        validator: Option<&'a dyn CandidateValidator>,
        executor: &'a dyn GraphExecutor,
        max_attempts: usize,
    ) -> Self {
        Self {
            generator,
            validator,
            executor,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Attempt budget
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Drive the loop to SUCCESS, EXHAUSTED or ABORTED
    ///
    /// `initial` is a template candidate; with `None` the first candidate is
    /// generated.
    pub fn run(&self, question: &str, initial: Option<QueryCandidate>) -> RefinementReport {
        let mut run = Run {
            question,
            attempt: 0,
            prior: Vec::new(),
            diagnostics: Vec::new(),
            last_candidate: None,
            last_error: String::new(),
        };
        let mut stages = Vec::new();
        let mut state = State::Init(initial);

        loop {
            stages.push(state.stage());
            state = match state {
                State::Init(Some(candidate)) => {
                    run.attempt = 1;
                    debug!(template = ?candidate.template_name, "Starting from template candidate");
                    State::Validating(candidate)
                }
                State::Init(None) => {
                    run.attempt = 1;
                    self.generate(&mut run)
                }
                State::Validating(candidate) => self.validate(&mut run, candidate),
                State::Executing(candidate, warnings) => self.execute(&mut run, candidate, warnings),
                State::Retry => {
                    if run.attempt >= self.max_attempts {
                        State::Exhausted
                    } else {
                        run.attempt += 1;
                        info!(
                            attempt = run.attempt,
                            max_attempts = self.max_attempts,
                            "Retrying with generated query"
                        );
                        self.generate(&mut run)
                    }
                }
                State::Success(success) => {
                    info!(attempts = run.attempt, rows = success.rows.len(), "Query succeeded");
                    return run.finish(Ok(success), stages);
                }
                State::Exhausted => {
                    warn!(attempts = run.attempt, last_error = %run.last_error, "Attempts exhausted");
                    let error = PipelineError::GenerationExhausted {
                        attempts: run.attempt,
                        last_error: run.last_error.clone(),
                    };
                    return run.finish(Err(error), stages);
                }
                State::Aborted(error) => {
                    warn!(error = %error, "Collaborator unavailable, giving up");
                    return run.finish(Err(error), stages);
                }
            };
        }
    }

    fn generate(&self, run: &mut Run<'_>) -> State {
        match self.generator.generate(run.question, &run.prior) {
            Ok(candidate) => State::Validating(candidate),
            Err(error) if error.is_unavailable() => State::Aborted(PipelineError::CollaboratorUnavailable {
                collaborator: Collaborator::LanguageModel,
                message: error.to_string(),
            }),
            Err(GeneratorError::NoQueryFound(excerpt)) => {
                warn!(attempt = run.attempt, "Model reply had no Cypher statement");
                run.diagnostics.push(PipelineError::ValidationError {
                    attempt: run.attempt,
                    issues: vec![ValidationIssue::Syntax {
                        message: NO_STATEMENT_MESSAGE.to_string(),
                    }],
                });
                run.prior.push(PriorAttempt::new(excerpt, NO_STATEMENT_MESSAGE));
                run.last_error = NO_STATEMENT_MESSAGE.to_string();
                State::Retry
            }
            Err(error) => {
                warn!(attempt = run.attempt, error = %error, "Generation failed");
                run.last_error = error.to_string();
                State::Retry
            }
        }
    }

    fn validate(&self, run: &mut Run<'_>, candidate: QueryCandidate) -> State {
        run.last_candidate = Some(candidate.clone());

        let Some(validator) = self.validator else {
            return State::Executing(candidate, Vec::new());
        };

        let outcome = validator.validate(&candidate);
        if outcome.valid {
            for warning in &outcome.warnings {
                debug!(attempt = run.attempt, warning = %warning, "Validation warning");
            }
            return State::Executing(candidate, outcome.warnings);
        }

        let summary = outcome.error_summary();
        warn!(attempt = run.attempt, errors = %summary, "Candidate failed validation");
        run.prior.push(PriorAttempt::new(candidate.query_text, summary.clone()));
        run.diagnostics.push(PipelineError::ValidationError {
            attempt: run.attempt,
            issues: outcome.errors,
        });
        run.last_error = summary;
        State::Retry
    }

    fn execute(
        &self,
        run: &mut Run<'_>,
        candidate: QueryCandidate,
        warnings: Vec<ValidationWarning>,
    ) -> State {
        debug!(attempt = run.attempt, query = %candidate.query_text, "Executing candidate");

        match self.executor.execute(&candidate.query_text, &candidate.parameters) {
            Ok(rows) => State::Success(LoopSuccess {
                candidate,
                rows,
                warnings,
            }),
            Err(ExecutionError {
                category: ErrorCategory::Unavailable,
                message,
            }) => State::Aborted(PipelineError::CollaboratorUnavailable {
                collaborator: Collaborator::Database,
                message,
            }),
            Err(error) => {
                warn!(attempt = run.attempt, error = %error, "Execution failed");
                run.last_error = error.to_string();
                run.prior.push(PriorAttempt::new(candidate.query_text, error.to_string()));
                run.diagnostics.push(PipelineError::ExecutionError {
                    attempt: run.attempt,
                    error,
                });
                State::Retry
            }
        }
    }
}

impl Run<'_> {
    fn finish(
        self,
        result: Result<LoopSuccess, PipelineError>,
        stages: Vec<LoopStage>,
    ) -> RefinementReport {
        RefinementReport {
            result,
            attempts_used: self.attempt,
            diagnostics: self.diagnostics,
            last_candidate: self.last_candidate,
            stages,
        }
    }
}
