//! Concurrent batch execution on the tokio runtime

use crate::pipeline::QueryPipeline;
use biograph_domain::{QueryOptions, QueryOutcome};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Runs many questions through one pipeline with bounded concurrency
///
/// Each question runs on the blocking thread pool, since the pipeline's
/// collaborators are synchronous. Outcomes come back in input order, and a
/// question whose worker panics yields a failed outcome in its slot.
///
/// # Examples
///
/// ```no_run
/// use biograph_router::{BatchRunner, QueryPipeline, PipelineConfig};
/// use biograph_domain::QueryOptions;
/// # use biograph_domain::{GraphExecutor, LanguageModel};
/// # use std::sync::Arc;
/// # async fn demo(model: Arc<dyn LanguageModel>, graph: Arc<dyn GraphExecutor>) -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = Arc::new(QueryPipeline::new(PipelineConfig::default(), model, graph)?);
/// let runner = BatchRunner::new(pipeline).with_workers(8);
///
/// let questions = vec!["What drugs target EGFR?".to_string()];
/// for outcome in runner.run(questions, QueryOptions::default()).await {
///     println!("{}", outcome.answer_text);
/// }
/// # Ok(())
/// # }
/// ```
pub struct BatchRunner {
    pipeline: Arc<QueryPipeline>,
    workers: usize,
}

impl BatchRunner {
    /// Create a runner using the pipeline's `batch_workers` setting
    pub fn new(pipeline: Arc<QueryPipeline>) -> Self {
        let workers = pipeline.config().batch_workers.max(1);
        Self { pipeline, workers }
    }

    /// Override the number of concurrent questions
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Concurrent question limit
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Shared pipeline
    pub fn pipeline(&self) -> &Arc<QueryPipeline> {
        &self.pipeline
    }

    /// Answer one question off the async executor threads
    pub async fn run_one(&self, question: String, options: QueryOptions) -> QueryOutcome {
        answer_blocking(Arc::clone(&self.pipeline), question, options).await
    }

    /// Answer every question; the result is index-aligned with the input
    pub async fn run(&self, questions: Vec<String>, options: QueryOptions) -> Vec<QueryOutcome> {
        info!(questions = questions.len(), workers = self.workers, "Starting batch");

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let handles: Vec<_> = questions
            .iter()
            .cloned()
            .map(|question| {
                let semaphore = Arc::clone(&semaphore);
                let pipeline = Arc::clone(&self.pipeline);
                tokio::spawn(async move {
                    // The semaphore is never closed, so acquiring only waits
                    let _permit = semaphore.acquire_owned().await.ok();
                    answer_blocking(pipeline, question, options).await
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (question, handle) in questions.into_iter().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(question = %question, error = %e, "Batch task failed");
                    self.pipeline
                        .internal_failure(&question, format!("batch task failed: {}", e))
                }
            };
            outcomes.push(outcome);
        }

        let succeeded = outcomes.iter().filter(|o| o.success).count();
        info!(total = outcomes.len(), succeeded, "Batch finished");
        outcomes
    }
}

/// Answer a list of questions with the pipeline's default worker count
pub async fn batch_query(
    pipeline: Arc<QueryPipeline>,
    questions: Vec<String>,
    options: QueryOptions,
) -> Vec<QueryOutcome> {
    BatchRunner::new(pipeline).run(questions, options).await
}

async fn answer_blocking(
    pipeline: Arc<QueryPipeline>,
    question: String,
    options: QueryOptions,
) -> QueryOutcome {
    let worker = Arc::clone(&pipeline);
    let asked = question.clone();
    match tokio::task::spawn_blocking(move || worker.query(&asked, options)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(question = %question, error = %e, "Question worker stopped");
            pipeline.internal_failure(&question, format!("question worker stopped: {}", e))
        }
    }
}
